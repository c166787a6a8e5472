// src/main.rs

use watchcmd::cli::{self, Invocation};
use watchcmd::logging;

#[tokio::main]
async fn main() {
    let invocation = cli::parse_args(std::env::args());

    // Logging comes up before any error is reported so usage errors go
    // through the same [ERROR] protocol as everything else.
    let log_level = match &invocation {
        Ok(Invocation::Run(args)) => args.log_level,
        _ => None,
    };
    if let Err(err) = logging::init_logging(log_level) {
        eprintln!("failed to initialise logging: {err:#}");
        std::process::exit(1);
    }

    let args = match invocation {
        Ok(Invocation::Run(args)) => args,
        Ok(Invocation::Exit(code)) => std::process::exit(code),
        Err(err) => {
            tracing::error!("{err:#}");
            println!("See detailed usage info by running `watchcmd --help`");
            std::process::exit(1);
        }
    };

    if let Err(err) = watchcmd::run(args).await {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}
