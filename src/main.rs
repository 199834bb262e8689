//! Kodegen Bundler Installer - compiles a Python application into a
//! standalone tree and packages it as an installer, disk image and update
//! archive.

use kodegen_bundler_installer::cli::{self, Args, OutputManager};
use std::process;

fn main() {
    let args = Args::parse_args();

    let default_filter = if args.verbose {
        "debug"
    } else if args.quiet || args.json {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let output = OutputManager::new(args.verbose, args.quiet);

    // The pipeline is strictly sequential; one thread is enough.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start async runtime: {}", e);
            process::exit(1);
        }
    };

    let exit_code = match runtime.block_on(cli::run(args)) {
        Ok(code) => code,
        Err(e) => {
            cli::report_error(&e, &output);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
