use std::env;

use rtenv_candle::{init, load};
use rtenv_core::config::{expand_path, Config};
use tracing_subscriber::EnvFilter;

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.first().is_some_and(|a| a == "-h" || a == "--help") {
        eprintln!("Usage: {} [show | load <artifact>]", prog);
        std::process::exit(0);
    }
    let cmd = if args.is_empty() { "show".to_string() } else { args.remove(0) };
    (cmd, args)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let (cmd, args) = parse_args();
    if cmd != "show" && cmd != "load" {
        eprintln!("Unknown command: {}", cmd);
        std::process::exit(1);
    }
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.runtime_settings()?;
    match cmd.as_str() {
        "show" => {
            let ctx = init(&settings)?;
            println!("{}", serde_json::to_string_pretty(&ctx)?);
        }
        "load" => {
            let path = match args.first() {
                Some(p) => expand_path(p),
                None => {
                    let p: String = config.get("artifacts.path").map_err(|_| {
                        anyhow::anyhow!("Usage: rtenv load <artifact> (or set artifacts.path)")
                    })?;
                    expand_path(p)
                }
            };
            let ctx = init(&settings)?;
            let tensors = load(&ctx, &path)?;
            let mut names: Vec<&String> = tensors.keys().collect();
            names.sort();
            println!("{} tensors from {} on {}", names.len(), path.display(), ctx.artifact_device());
            for name in names {
                let t = &tensors[name];
                println!("  {:<48} {:?} {:?}", name, t.dims(), t.dtype());
            }
        }
        _ => unreachable!("command validated above"),
    }
    Ok(())
}
