fn main() -> anyhow::Result<()> {
    meshwright::cli::run_cli()
}
