fn main() -> anyhow::Result<()> {
    safe_log_fixer::run_cli()
}
