use std::{env, error::Error, fs, path::PathBuf};

const FALLBACK_BAUD: u32 = 115_200;

fn main() -> Result<(), Box<dyn Error>> {
    let out = &PathBuf::from(env::var("OUT_DIR")?);

    println!("cargo:rerun-if-env-changed=SERIALTRACE_BAUD");
    println!("cargo:rerun-if-changed=serialtrace_linker.x.in");

    let baud = match env::var("SERIALTRACE_BAUD") {
        Ok(v) => match v.trim().parse::<u32>() {
            Ok(b) if b > 0 => b,
            _ => {
                println!(
                    "cargo:warning=SERIALTRACE_BAUD={v:?} is not a valid baud rate, using {FALLBACK_BAUD}"
                );
                FALLBACK_BAUD
            }
        },
        Err(_) => FALLBACK_BAUD,
    };

    fs::write(
        out.join("config.rs"),
        format!("pub const DEFAULT_BAUD: u32 = {baud};\n"),
    )?;

    if env::var_os("CARGO_FEATURE_PROGMEM").is_some() {
        let linker_script = fs::read_to_string("serialtrace_linker.x.in")?;
        fs::write(out.join("serialtrace_linker.x"), linker_script)?;
        println!("cargo:rustc-link-search={}", out.display());
    }

    Ok(())
}
