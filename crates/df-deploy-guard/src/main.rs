//! CLI entrypoint: scan a manifest directory and exit nonzero on violations.

use clap::Parser;
use df_deploy_guard::scan_dir;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "deploy-guard")]
#[command(about = "Verify Kubernetes manifests expose nothing outside the cluster")]
struct Args {
    /// Directory of Kubernetes manifests to scan
    #[arg(long, default_value = "k8s")]
    dir: PathBuf,
}

fn main() {
    let args = Args::parse();

    if !args.dir.exists() {
        println!(
            "deploy-guard: {} not found, nothing to scan",
            args.dir.display()
        );
        return;
    }

    match scan_dir(&args.dir) {
        Ok(violations) if violations.is_empty() => {
            println!(
                "deploy-guard: {} is clean, all services stay cluster-internal",
                args.dir.display()
            );
        }
        Ok(violations) => {
            for violation in &violations {
                eprintln!(
                    "deploy-guard: {} declares forbidden external exposure ({})",
                    violation.file.display(),
                    violation.pattern
                );
            }
            eprintln!(
                "deploy-guard: {} violation(s) found, refusing to deploy",
                violations.len()
            );
            process::exit(1);
        }
        Err(err) => {
            eprintln!("deploy-guard: {err}");
            process::exit(2);
        }
    }
}
