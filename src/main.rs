use pongwait::{config::get_or_init_config, App, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // We have a different logging mechanism for production
    #[cfg(not(debug_assertions))]
    {
        pongwait::init_production_tracing()
    }
    #[cfg(debug_assertions)]
    {
        pongwait::init_dbg_tracing();
    }

    let config = get_or_init_config().clone();
    let app = App::build_from_config(config).await?;

    pongwait::serve(app).await?;

    Ok(())
}
