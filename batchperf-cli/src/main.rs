use std::process::ExitCode;

use batchperf::{ConnectOptions, Connection, DriverKind, Mode};
use clap::{Parser, ValueEnum};
use rand::{rngs::StdRng, SeedableRng};

/// Compare batched and unbatched execution of 1000 inserts
#[derive(Parser, Debug)]
#[command(name = "batchperf")]
struct Args {
    /// Database url, e.g. `sqlite://memory` or `mysql://127.0.0.1/perf`
    #[arg(long, env = "BATCHPERF_URL", default_value = "sqlite://memory")]
    url: String,

    /// Driver identifier: `sqlite` or `mysql`
    #[arg(long, env = "BATCHPERF_DRIVER", default_value = "sqlite")]
    driver: DriverKind,

    #[arg(long, env = "BATCHPERF_USERNAME", default_value = "")]
    username: String,

    #[arg(long, env = "BATCHPERF_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    #[arg(long, env = "BATCHPERF_MODE", value_enum, default_value_t = ModeArg::Both)]
    mode: ModeArg,

    /// Seed for the inserted values, random when absent
    #[arg(long, env = "BATCHPERF_SEED")]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Both,
    Batched,
    Unbatched,
}

impl ModeArg {
    fn modes(&self) -> &'static [Mode] {
        match self {
            Self::Both => &Mode::ALL,
            Self::Batched => &[Mode::Batched],
            Self::Unbatched => &[Mode::Unbatched],
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let options =
        ConnectOptions::new(args.driver, &args.url).credentials(&args.username, &args.password);

    let mut conn = match Connection::connect(&options).await {
        Ok(conn) => {
            log::info!("Connected to database");
            conn
        }
        Err(e) => {
            log::error!("Error connecting to database: {}", e);
            Connection::unopened()
        }
    };

    if conn.is_open() {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        for outcome in batchperf::compare(&conn, args.mode.modes(), &mut rng).await {
            match outcome.result {
                Ok(timing) => {
                    println!("{}", timing);
                    log::info!("Executed {} SQL statements", outcome.mode);
                }
                Err(e) => log::error!("Error executing {} SQL statements: {}", outcome.mode, e),
            }
        }
    }

    shutdown(conn.close().await)
}

/// A failed close may leak the session, so it is the only fatal outcome
fn shutdown(closed: batchperf::error::Result<()>) -> ExitCode {
    match closed {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Error closing DB connection: {}", e);
            ExitCode::FAILURE
        }
    }
}
