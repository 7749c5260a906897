//! Theme preference.

use anyhow::Result;
use stookwijzer::{Storage, Theme, UiEvent};
use stookwijzer_config::StookwijzerConfig;
use stookwijzer_kernel::THEME_KEY;

use crate::app;
use crate::style::print_success;

/// Sets the theme, or flips the saved one when `theme` is `None`.
pub fn run(config: &StookwijzerConfig, theme: Option<Theme>) -> Result<()> {
    app::async_runtime()?.block_on(async {
        let mut runtime = app::build(config)?;
        let saved = Theme::from_name(runtime.storage().get(THEME_KEY).as_deref());
        let theme = theme.unwrap_or_else(|| saved.toggled());

        runtime.dispatch(UiEvent::SetTheme(theme));
        runtime.settle().await;

        print_success(&format!("Thema ingesteld op {theme}"));
        Ok(())
    })
}
