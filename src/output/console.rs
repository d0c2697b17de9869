//! Console output utilities.

use console::style;

use crate::hooks::HookOutcome;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     notebook-relay                                    ║
║     dataset uploads and notebook sync                 ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print where the relay will listen and forward to.
pub fn print_server_summary(listen: &str, datasets: &str, projects: &str, upload_dir: Option<&str>) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Listen: {}", listen);
    println!("  Datasets: {}", datasets);
    println!("  Projects: {}", projects);
    println!("  Uploads: {}", upload_dir.unwrap_or("not stored"));
    println!();
}

/// Print the result of a post-save run.
pub fn print_hook_outcome(outcome: &HookOutcome) {
    match outcome {
        HookOutcome::Skipped { reason } => {
            print_info(&format!("Nothing to sync ({:?})", reason));
        }
        HookOutcome::Updated {
            task_id,
            resource,
            parameters,
        } => {
            print_success(&format!(
                "Updated {} {} ({} parameters)",
                resource, task_id, parameters
            ));
        }
        HookOutcome::Failed { task_id, reason } => {
            print_warning(&format!("Could not sync {}: {}", task_id, reason));
        }
    }
}
