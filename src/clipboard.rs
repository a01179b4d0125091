//! System clipboard access, behind the `clipboard` feature.

#[cfg(feature = "clipboard")]
pub fn copy_text(text: &str) -> anyhow::Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())?;
    Ok(())
}

#[cfg(not(feature = "clipboard"))]
pub fn copy_text(_text: &str) -> anyhow::Result<()> {
    anyhow::bail!("built without clipboard support")
}
