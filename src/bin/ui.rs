use mailwave::{config::load_config, ui, Result};

#[tokio::main]
async fn main() -> Result<()> {
    #[cfg(not(debug_assertions))]
    {
        mailwave::init_production_tracing()
    }
    #[cfg(debug_assertions)]
    {
        mailwave::init_dbg_tracing();
    }

    let config = load_config()?;
    let app = ui::UiApp::build_from_config(&config.ui_config).await?;

    ui::serve(app).await
}
