pub mod inspector;

use std::path::PathBuf;

pub fn run_inspector(gif_folder: PathBuf) -> crate::Result<()> {
    use iced::Result as IcedResult;

    let result: IcedResult = inspector::run_gif_inspector(gif_folder);

    result.map_err(|e| crate::Error::Gui(format!("GUI error: {e}")))?;
    Ok(())
}
