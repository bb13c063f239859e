//! Subcommand implementations
//!
//! Exit codes follow sysexits(3): the lock being held elsewhere is a
//! temporary failure, an unreachable store is "service unavailable".

use clap::Args;
use dlock_application::GuardInvoker;
use dlock_domain::{Error, LockKey, LockOutcome};
use dlock_domain::ports::LockConnection;
use dlock_infrastructure::config::AppConfig;
use dlock_infrastructure::pool::StoreConnectionPool;
use std::process::{ExitCode, ExitStatus};
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const EX_USAGE: u8 = 64;
const EX_UNAVAILABLE: u8 = 69;
const EX_TEMPFAIL: u8 = 75;
const EX_CONFIG: u8 = 78;
const EX_NOT_FOUND: u8 = 127;
const EX_INTERRUPTED: u8 = 130;

/// Arguments of `dlock exec`
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Lock key naming the critical section
    #[arg(short, long)]
    pub key: String,

    /// Lock expiry, e.g. "5s" or "1m" (whole seconds)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub expire: Option<Duration>,

    /// How long to wait for a held lock, e.g. "2s"; without it a single attempt is made
    #[arg(long, value_parser = humantime::parse_duration)]
    pub wait: Option<Duration>,

    /// Command and arguments to run while holding the lock
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// `dlock ping`
pub async fn ping(config: &AppConfig) -> ExitCode {
    let endpoint = config.store.to_endpoint();
    let pools = StoreConnectionPool::global();

    let probed = async {
        let mut connection = pools.checkout(&endpoint).await?;
        let pinged = connection.ping().await;
        pools.give_back(connection).await;
        pinged
    }
    .await;

    match probed {
        Ok(()) => {
            println!("PONG from {}", endpoint.identity());
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}

/// `dlock exec`
pub async fn exec(config: &AppConfig, args: ExecArgs) -> ExitCode {
    let key = match LockKey::new(args.key.as_str()) {
        Ok(key) => key,
        Err(e) => return report(&e),
    };
    let Some((program, program_args)) = args.command.split_first() else {
        eprintln!("dlock: no command given");
        return ExitCode::from(EX_USAGE);
    };

    let mut options = config.lock.to_options();
    if let Some(expire) = args.expire {
        options = options.with_expire(expire);
    }
    if let Some(wait) = args.wait {
        options = options.with_wait(wait);
    }
    if let Err(e) = options.expire_secs() {
        return report(&e);
    }

    let invoker =
        GuardInvoker::new(StoreConnectionPool::global().for_endpoint(config.store.to_endpoint()));

    // Ctrl-C abandons a pending wait; once the command runs it gets the signal itself
    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let outcome = invoker
        .run_cancellable(&key, options, &cancel, || async {
            info!(key = %key, program = %program, "Running command under lock");
            Command::new(program).args(program_args).status().await
        })
        .await;
    interrupt.abort();

    match outcome {
        Ok(LockOutcome::Acquired(Ok(status))) => exit_code(status),
        Ok(LockOutcome::Acquired(Err(e))) => {
            error!(key = %key, program = %program, error = %e, "Command failed to start");
            eprintln!("dlock: cannot run {program}: {e}");
            ExitCode::from(EX_NOT_FOUND)
        }
        Ok(LockOutcome::Contended) => {
            eprintln!("dlock: lock {key} is held by another owner");
            ExitCode::from(EX_TEMPFAIL)
        }
        Err(e) => report(&e),
    }
}

fn exit_code(status: ExitStatus) -> ExitCode {
    if let Some(code) = status.code() {
        return ExitCode::from(u8::try_from(code).unwrap_or(1));
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ExitCode::from(u8::try_from(128 + signal).unwrap_or(1));
        }
    }
    ExitCode::FAILURE
}

fn report(e: &Error) -> ExitCode {
    eprintln!("dlock: {e}");
    let code = match e {
        Error::StoreUnavailable { .. } => EX_UNAVAILABLE,
        Error::InvalidArgument { .. } => EX_USAGE,
        Error::Configuration { .. } => EX_CONFIG,
        Error::Cancelled { .. } => EX_INTERRUPTED,
        _ => 1,
    };
    ExitCode::from(code)
}
