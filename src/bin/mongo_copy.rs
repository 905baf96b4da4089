use clap::Parser;
use mongo_copy::confirm::confirm_clear;
use mongo_copy::{report, Connection, CopyConf, DatabaseCopier, FailurePolicy, Result};
use std::ffi::OsStr;
use std::io;
use std::path::Path;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser, Debug)]
#[clap(version = env!("CARGO_PKG_VERSION"), author = env!("CARGO_PKG_AUTHORS"))]
struct Opts {
    /// source database uri, must contain the database name, e.g: mongodb://localhost/shop
    #[clap(short, long)]
    src: Option<String>,
    /// destination database uri, the database it names will be cleared.
    #[clap(short, long)]
    dst: Option<String>,
    /// configuration file path, `--src` and `--dst` override the urls inside.
    #[clap(short, long)]
    conf: Option<String>,
    /// what to do when one collection fails: `abort` or `continue`.
    #[clap(long)]
    on_error: Option<FailurePolicy>,
    /// log file path, if not specified, all log information will be output to stdout.
    #[clap(long)]
    log_path: Option<String>,
}

fn main() {
    let opts: Opts = Opts::parse();
    let guard = init_logger(opts.log_path.as_deref());

    let exit_code = match run(opts) {
        Ok(()) => 0,
        Err(e) => {
            error!("database copy error: {}", report(&e));
            1
        }
    };
    // flush pending log lines, `exit` doesn't run destructors.
    drop(guard);
    std::process::exit(exit_code);
}

fn init_logger(log_path: Option<&str>) -> WorkerGuard {
    let collector = tracing_subscriber::fmt();
    let (non_blocking, guard) = match log_path {
        Some(path) => {
            let path = Path::new(path);
            let dir_name = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .unwrap_or_else(|| OsStr::new("mongo_copy.log"));
            let file_appender = tracing_appender::rolling::daily(dir_name, file_name);
            tracing_appender::non_blocking(file_appender)
        }
        None => tracing_appender::non_blocking(io::stdout()),
    };
    collector.with_writer(non_blocking).init();
    guard
}

fn build_conf(opts: &Opts) -> Result<CopyConf> {
    let mut conf = match &opts.conf {
        Some(path) => CopyConf::from_file(path)?,
        None => CopyConf::new(String::new(), String::new()),
    };
    if let Some(src) = &opts.src {
        conf = conf.with_src_uri(src.clone());
    }
    if let Some(dst) = &opts.dst {
        conf = conf.with_dst_uri(dst.clone());
    }
    if let Some(policy) = opts.on_error {
        conf = conf.with_failure_policy(policy);
    }
    Ok(conf)
}

fn run(opts: Opts) -> Result<()> {
    let conf = build_conf(&opts)?;
    let conn = Connection::new(&conf)?;
    conn.check_permissions()?;

    let stdin = io::stdin();
    if !confirm_clear(conn.target_db_name(), stdin.lock(), io::stdout()) {
        info!(dst_db = conn.target_db_name(), "Copy cancelled, nothing changed.");
        return Ok(());
    }

    let (source, target) = (conn.source(), conn.target());
    let copy_report = DatabaseCopier::new(&source, &target)
        .on_error(conf.get_failure_policy())
        .copy_database()?;
    info!(
        collections = copy_report.collections.len(),
        documents = copy_report.transferred(),
        "database was copied"
    );
    Ok(())
}
