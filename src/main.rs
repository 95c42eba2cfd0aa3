fn main() -> anyhow::Result<()> {
    medigenius_chat::cli::run()
}
