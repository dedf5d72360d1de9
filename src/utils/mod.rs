mod display;

pub use display::{print_contract, print_error, print_header, print_info, print_success, print_tool_call};
