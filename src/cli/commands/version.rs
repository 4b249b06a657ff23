//! Version command - show version information

use anyhow::Result;

use crate::keys::DEFAULT_KEY_TYPES;

/// Execute the version command
pub fn execute(verbose: bool) -> Result<()> {
    print_version(verbose);
    Ok(())
}

/// Print version information
///
/// If verbose is false, prints a single line with name and version.
/// If verbose is true, prints detailed build and feature information.
pub fn print_version(verbose: bool) {
    println!("{} {}", crate::NAME, crate::VERSION);

    if verbose {
        println!();
        println!("Built-in key types:");
        for key_type in DEFAULT_KEY_TYPES {
            println!("  - {}", key_type);
        }
        println!();
        println!("Build info:");
        println!("  Target:    {}", env!("AUTHKEYS_BUILD_TARGET"));
        println!("  Rust:      {}", env!("AUTHKEYS_RUSTC_VERSION"));
        if let Ok(exe) = std::env::current_exe() {
            println!("  Executable: {}", exe.display());
        }
        println!();
        println!("License:    MIT");
    }
}
