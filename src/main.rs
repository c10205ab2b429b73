fn main() {
    if let Err(e) = fraga::cli::main() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
