fn main() {
    if let Err(err) = speclens::cli::run() {
        speclens::ui::eprintln_error(&err);
        std::process::exit(speclens::exit::exit_code(&err));
    }
}
