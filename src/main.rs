fn main() {
    if let Err(e) = flava::cli::main() {
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
}
