//! List tools command implementation.

use misra_gcs_adapters::Tool;

/// Runs the list-tools command.
pub fn run() {
    println!("Supported tools:\n");
    println!("{:<12} MISRA versions", "Tool");
    println!("{}", "-".repeat(60));

    for tool in Tool::ALL {
        let versions: Vec<String> = tool
            .supported_versions()
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("{:<12} {}", tool.name(), versions.join(", "));
    }

    println!("\nSelect a tool with --tool or `tool` in misra-gcs.toml, e.g.:");
    println!("  misra-gcs check --tool pclint --warnings lint-output.txt");
    println!("  misra-gcs check --tool cppcheck --sources sources.txt");
}
