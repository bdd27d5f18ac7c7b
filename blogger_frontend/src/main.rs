fn main() -> anyhow::Result<()> {
    env_logger::init();
    blogger_frontend::run_frontend()
}
