fn main() {

    // 1. Parse commandline arguments
    let cli_args = cfdcase::args::parse_cli_args();

    // 2. Run the command, exiting with its code
    match cfdcase::handle_cli_args(cli_args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(err.exit_code());
        },
    }
}
