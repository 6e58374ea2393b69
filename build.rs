use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const GIT_WATCH: [&str; 3] = ["HEAD", "index", "refs/heads"];

fn main() {
    let hash = match git(&["rev-parse", "--short", "HEAD"]) {
        Some(rev) if !rev.is_empty() => {
            let dirty = git(&["status", "--porcelain", "-uno"]).is_some_and(|s| !s.is_empty());
            if dirty { format!("{rev}*") } else { rev }
        }
        _ => "unknown".to_string(),
    };

    let epoch = std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

    println!("cargo:rustc-env=BUILD_HASH={hash}");
    println!("cargo:rustc-env=BUILD_EPOCH={epoch}");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    for entry in GIT_WATCH {
        println!("cargo:rerun-if-changed=.git/{entry}");
    }
}

fn git(args: &[&str]) -> Option<String> {
    let out = Command::new("git").args(args).output().ok()?;
    out.status
        .success()
        .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
}
