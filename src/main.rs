#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    recletter_server::run().await
}
