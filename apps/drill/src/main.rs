fn main() -> anyhow::Result<()> {
    recall_drill::run()
}
