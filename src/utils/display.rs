use crate::agent::ToolCallRecord;
use crate::tools::ToolContract;
use colored::*;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.len()).bright_cyan());
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

pub fn print_tool_call(record: &ToolCallRecord) {
    let status = if record.success {
        "ok".green()
    } else {
        "failed".red()
    };
    println!(
        "  {} {} ({}ms)",
        record.tool.yellow().bold(),
        status,
        record.duration_ms
    );
}

pub fn print_contract(contract: &ToolContract) {
    println!("{}", contract.name.yellow().bold());
    println!("  {}", contract.description);
    for (name, schema) in &contract.parameters {
        let requirement = if contract.is_required(name) {
            "required".bright_red()
        } else {
            "optional".dimmed()
        };
        println!(
            "    {} ({}, {}): {}",
            name.bold(),
            schema.param_type,
            requirement,
            schema.description
        );
    }
}
