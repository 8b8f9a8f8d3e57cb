fn main() -> Result<(), Box<dyn std::error::Error>> {
    modechat::cli::main()
}
