use crate::config::InspectorConfig;
use crate::decode::{self, BitDepths, DecodeGif, GifAnimation, Iterations, RgbaDecoder};
use crate::scan;
use iced::{
    keyboard::{key::Named, Key}, widget::{button, column, container, image, responsive, row, scrollable, stack, text}, Background, Border, Color, Element, Length, Pixels, Size,
    Task,
    Theme,
};
use std::path::PathBuf;
use std::sync::Arc;

macro_rules! themes {
    ($($variant:ident),*) => {
        fn string_to_theme(theme_str: &str) -> Theme {
            match theme_str {
                $(stringify!($variant) => Theme::$variant,)*
                _ => Theme::Dark,
            }
        }
    };
}

themes!(
    Dark,
    Light,
    Dracula,
    Nord,
    SolarizedLight,
    SolarizedDark,
    GruvboxLight,
    GruvboxDark,
    CatppuccinLatte,
    CatppuccinFrappe,
    CatppuccinMacchiato,
    CatppuccinMocha,
    TokyoNight,
    TokyoNightStorm,
    TokyoNightLight,
    KanagawaWave,
    KanagawaDragon,
    KanagawaLotus,
    Moonfly,
    Nightfly,
    Oxocarbon
);

const ERROR_TEXT: &str = "Unable to load gif.";

#[derive(Debug, Clone)]
pub enum Message {
    FilesScanned(Vec<PathBuf>),
    FileSelected(usize),
    GifLoaded(PathBuf, Option<GifAnimation>),
    NoticeDismissed,
    KeyPressed(Key),
}

enum FrameDisplay {
    Empty,
    Loading,
    Error,
    Populated(LoadedGif),
}

struct LoadedGif {
    iterations: Iterations,
    width: u16,
    height: u16,
    frames: Vec<FrameVisual>,
}

// One cell of the frame panel: the frame's rendering handle plus its
// "<index>: <duration>ms" caption. Dropping it releases the handle.
struct FrameVisual {
    handle: image::Handle,
    caption: String,
    width: u16,
    height: u16,
}

impl From<GifAnimation> for LoadedGif {
    fn from(animation: GifAnimation) -> Self {
        let frames = animation
            .frames
            .into_iter()
            .enumerate()
            .map(|(i, frame)| FrameVisual {
                caption: format!("{}: {}ms", i + 1, frame.duration_ms),
                width: frame.width,
                height: frame.height,
                handle: image::Handle::from_rgba(
                    u32::from(frame.width),
                    u32::from(frame.height),
                    frame.pixels,
                ),
            })
            .collect();

        Self {
            iterations: animation.iterations,
            width: animation.width,
            height: animation.height,
            frames,
        }
    }
}

pub struct GifInspector {
    gif_folder: PathBuf,
    files: Vec<PathBuf>,
    selected: Option<usize>,
    display: FrameDisplay,
    show_no_files_notice: bool,
    config: InspectorConfig,
    decoder: Arc<dyn DecodeGif + Send + Sync>,
}

impl GifInspector {
    pub fn new(gif_folder: PathBuf) -> (Self, Task<Message>) {
        Self::with_decoder(gif_folder, Arc::new(RgbaDecoder))
    }

    pub fn with_decoder(
        gif_folder: PathBuf,
        decoder: Arc<dyn DecodeGif + Send + Sync>,
    ) -> (Self, Task<Message>) {
        let config = InspectorConfig::load_or_default().unwrap_or_default();

        let app = Self {
            gif_folder: gif_folder.clone(),
            files: Vec::new(),
            selected: None,
            display: FrameDisplay::Empty,
            show_no_files_notice: false,
            config,
            decoder,
        };

        let task = Self::scan_folder_task(gif_folder);
        (app, task)
    }

    fn scan_folder_task(folder: PathBuf) -> Task<Message> {
        Task::future(async move {
            match scan::scan_gif_files(&folder).await {
                Ok(files) => files,
                Err(e) => {
                    eprintln!("Error scanning {}: {}", folder.display(), e);
                    Vec::new()
                }
            }
        })
        .map(Message::FilesScanned)
    }

    fn load_gif_task(path: PathBuf, decoder: Arc<dyn DecodeGif + Send + Sync>) -> Task<Message> {
        Task::future(async move {
            let result = tokio::task::spawn_blocking({
                let path = path.clone();
                move || decode::load_gif_file(&path, decoder.as_ref(), BitDepths::ALL)
            })
            .await;

            let animation = match result {
                Ok(Ok(animation)) => Some(animation),
                Ok(Err(e)) => {
                    eprintln!("Failed to load {}: {}", path.display(), e);
                    None
                }
                Err(e) => {
                    eprintln!("Gif load task failed: {e}");
                    None
                }
            };

            Message::GifLoaded(path, animation)
        })
    }

    fn do_update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FilesScanned(files) => {
                self.files = files;
                if self.files.is_empty() {
                    self.show_no_files_notice = true;
                    Task::none()
                } else {
                    self.do_update(Message::FileSelected(0))
                }
            }
            Message::FileSelected(index) => {
                let Some(path) = self.files.get(index).cloned() else {
                    return Task::none();
                };
                self.selected = Some(index);
                // Drops the previous visuals before the new load starts.
                self.display = FrameDisplay::Loading;
                Self::load_gif_task(path, Arc::clone(&self.decoder))
            }
            Message::GifLoaded(path, animation) => {
                let current = self.selected.and_then(|i| self.files.get(i));
                if current != Some(&path) {
                    // Result of a superseded selection; never materialized.
                    return Task::none();
                }
                self.display = match animation {
                    Some(animation) => FrameDisplay::Populated(LoadedGif::from(animation)),
                    None => FrameDisplay::Error,
                };
                Task::none()
            }
            Message::NoticeDismissed => {
                self.show_no_files_notice = false;
                Task::none()
            }
            Message::KeyPressed(key) => {
                let total = self.files.len();
                if total == 0 {
                    return Task::none();
                }
                let idx = self.selected.unwrap_or(0);

                match key {
                    Key::Named(Named::ArrowDown) => {
                        self.do_update(Message::FileSelected((idx + 1) % total))
                    }
                    Key::Named(Named::ArrowUp) => {
                        let previous = if idx == 0 { total - 1 } else { idx - 1 };
                        self.do_update(Message::FileSelected(previous))
                    }
                    _ => Task::none(),
                }
            }
        }
    }

    fn status_text(&self) -> String {
        match &self.display {
            FrameDisplay::Empty => String::new(),
            FrameDisplay::Loading => "Loading...".to_string(),
            FrameDisplay::Error => ERROR_TEXT.to_string(),
            FrameDisplay::Populated(gif) => format!(
                "Iterations: {}  Size: {}x{}",
                gif.iterations, gif.width, gif.height
            ),
        }
    }

    fn file_list(&self) -> Element<'_, Message> {
        let entries: Vec<Element<Message>> = self
            .files
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let entry = button(text(path.to_string_lossy().into_owned()).size(13))
                    .width(Length::Fill)
                    .on_press(Message::FileSelected(i));

                if self.selected == Some(i) {
                    entry.style(button::primary).into()
                } else {
                    entry.style(button::text).into()
                }
            })
            .collect();

        scrollable(column(entries).spacing(2).padding(5))
            .height(Length::Fill)
            .into()
    }

    fn frames_panel(&self, actual_width: usize) -> Element<'_, Message> {
        let FrameDisplay::Populated(gif) = &self.display else {
            if matches!(self.display, FrameDisplay::Loading) {
                return container(text("Loading..."))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .center_x(Length::Fill)
                    .center_y(Length::Fill)
                    .into();
            }
            // Error and Empty both leave the panel without children.
            return container(text(""))
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        };

        let spacing = 10;
        let padding = 10;
        let cell_width = usize::from(gif.width).max(80);
        let frames_per_row = (actual_width.saturating_sub(padding) / (cell_width + spacing)).max(1);

        let mut rows = Vec::new();

        for chunk in gif.frames.chunks(frames_per_row) {
            let mut row_elements: Vec<Element<Message>> = Vec::new();

            for visual in chunk {
                let img = image(visual.handle.clone())
                    .width(visual.width)
                    .height(visual.height);

                let cell = column(vec![
                    img.into(),
                    text(visual.caption.clone()).size(12).into(),
                ])
                .spacing(4)
                .align_x(iced::Alignment::Center);

                row_elements.push(
                    container(cell)
                        .padding(3)
                        .style(|_theme| container::Style {
                            background: Some(Background::Color(Color::from_rgba(
                                0.3, 0.3, 0.3, 0.5,
                            ))),
                            border: Border {
                                width: 1.0,
                                color: Color::from_rgb(0.5, 0.5, 0.5),
                                radius: 5.0.into(),
                            },
                            ..Default::default()
                        })
                        .into(),
                );
            }

            rows.push(row(row_elements).spacing(Pixels(spacing as f32)).into());
        }

        let grid = column(rows)
            .spacing(Pixels(spacing as f32))
            .padding(20)
            .width(Length::Shrink);

        let scrollable_content = scrollable(grid).width(Length::Shrink).height(Length::Fill);

        container(scrollable_content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    fn no_files_notice(&self) -> Element<'_, Message> {
        let message = format!(
            "No .gif files found in {} or its subdirectories.",
            self.gif_folder.display()
        );

        container(
            column(vec![
                text("No Files").size(20).into(),
                text(message).into(),
                button("OK").on_press(Message::NoticeDismissed).into(),
            ])
            .spacing(10)
            .padding(20),
        )
        .style(|theme: &Theme| container::Style {
            background: Some(Background::Color(theme.palette().background)),
            border: Border::default().width(2).color(theme.palette().primary),
            ..Default::default()
        })
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
    }

    fn view_content(&self) -> Element<'_, Message> {
        let list = container(self.file_list()).width(300).height(Length::Fill);

        let right = column(vec![
            container(text(self.status_text()).size(14))
                .padding(10)
                .into(),
            responsive(move |size| self.frames_panel(size.width as usize)).into(),
        ]);

        let content = row(vec![list.into(), right.into()]).spacing(10);

        if self.show_no_files_notice {
            stack([content.into(), self.no_files_notice()]).into()
        } else {
            content.into()
        }
    }

    fn theme(&self) -> Theme {
        string_to_theme(&self.config.theme)
    }
}

pub fn run_gif_inspector(gif_folder: PathBuf) -> iced::Result {
    iced::application("GIF Inspector", update, view)
        .theme(|app: &GifInspector| app.theme())
        .subscription(subscription)
        .window_size(Size {
            width: 1000.0,
            height: 700.0,
        })
        .run_with(|| GifInspector::new(gif_folder))
}

fn subscription(_app: &GifInspector) -> iced::Subscription<Message> {
    iced::keyboard::on_key_press(|key, _modifiers| Some(Message::KeyPressed(key)))
}

fn update(app: &mut GifInspector, message: Message) -> Task<Message> {
    app.do_update(message)
}

fn view(app: &GifInspector) -> Element<'_, Message> {
    app.view_content()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Frame;

    fn test_animation(frame_count: usize) -> GifAnimation {
        let frames = (0..frame_count)
            .map(|i| Frame {
                width: 2,
                height: 2,
                pixels: vec![0; 16],
                duration_ms: 100 * (i as u32 + 1),
            })
            .collect();

        GifAnimation {
            iterations: Iterations::Infinite,
            width: 2,
            height: 2,
            frames,
        }
    }

    fn inspector_with_files(files: Vec<PathBuf>) -> GifInspector {
        let mut app = GifInspector {
            gif_folder: PathBuf::from("/tmp/gifs"),
            files: Vec::new(),
            selected: None,
            display: FrameDisplay::Empty,
            show_no_files_notice: false,
            config: InspectorConfig::default(),
            decoder: Arc::new(RgbaDecoder),
        };
        let _ = app.do_update(Message::FilesScanned(files));
        app
    }

    fn visible_frame_count(app: &GifInspector) -> usize {
        match &app.display {
            FrameDisplay::Populated(gif) => gif.frames.len(),
            _ => 0,
        }
    }

    #[test]
    fn scan_with_files_auto_selects_first() {
        let app = inspector_with_files(vec![PathBuf::from("a.gif"), PathBuf::from("b.gif")]);

        assert_eq!(app.selected, Some(0));
        assert!(matches!(app.display, FrameDisplay::Loading));
        assert!(!app.show_no_files_notice);
    }

    #[test]
    fn scan_with_no_files_shows_notice() {
        let mut app = inspector_with_files(Vec::new());

        assert!(app.show_no_files_notice);
        assert_eq!(app.selected, None);
        assert!(matches!(app.display, FrameDisplay::Empty));

        let _ = app.do_update(Message::NoticeDismissed);
        assert!(!app.show_no_files_notice);
    }

    #[test]
    fn successful_load_populates_frames_with_captions() {
        let mut app = inspector_with_files(vec![PathBuf::from("a.gif")]);

        let _ = app.do_update(Message::GifLoaded(
            PathBuf::from("a.gif"),
            Some(test_animation(3)),
        ));

        assert_eq!(visible_frame_count(&app), 3);
        let FrameDisplay::Populated(gif) = &app.display else {
            panic!("expected populated display");
        };
        assert_eq!(gif.frames[0].caption, "1: 100ms");
        assert_eq!(gif.frames[1].caption, "2: 200ms");
        assert_eq!(gif.frames[2].caption, "3: 300ms");
        assert_eq!(app.status_text(), "Iterations: infinite  Size: 2x2");
    }

    #[test]
    fn failed_load_shows_error_and_leaves_panel_empty() {
        let mut app = inspector_with_files(vec![PathBuf::from("a.gif")]);

        let _ = app.do_update(Message::GifLoaded(PathBuf::from("a.gif"), None));

        assert!(matches!(app.display, FrameDisplay::Error));
        assert_eq!(app.status_text(), "Unable to load gif.");
        assert_eq!(visible_frame_count(&app), 0);
    }

    #[test]
    fn stale_result_for_superseded_selection_is_discarded() {
        let mut app = inspector_with_files(vec![PathBuf::from("a.gif"), PathBuf::from("b.gif")]);

        let _ = app.do_update(Message::FileSelected(1));
        let _ = app.do_update(Message::GifLoaded(
            PathBuf::from("a.gif"),
            Some(test_animation(2)),
        ));

        assert_eq!(app.selected, Some(1));
        assert!(matches!(app.display, FrameDisplay::Loading));
        assert_eq!(visible_frame_count(&app), 0);
    }

    #[test]
    fn switching_selection_clears_previous_frames() {
        let mut app = inspector_with_files(vec![PathBuf::from("a.gif"), PathBuf::from("b.gif")]);

        let _ = app.do_update(Message::GifLoaded(
            PathBuf::from("a.gif"),
            Some(test_animation(2)),
        ));
        assert_eq!(visible_frame_count(&app), 2);

        let _ = app.do_update(Message::FileSelected(1));

        assert!(matches!(app.display, FrameDisplay::Loading));
        assert_eq!(visible_frame_count(&app), 0);
    }

    #[test]
    fn arrow_keys_move_selection_and_wrap() {
        let mut app = inspector_with_files(vec![PathBuf::from("a.gif"), PathBuf::from("b.gif")]);

        let _ = app.do_update(Message::KeyPressed(Key::Named(Named::ArrowDown)));
        assert_eq!(app.selected, Some(1));

        let _ = app.do_update(Message::KeyPressed(Key::Named(Named::ArrowDown)));
        assert_eq!(app.selected, Some(0));

        let _ = app.do_update(Message::KeyPressed(Key::Named(Named::ArrowUp)));
        assert_eq!(app.selected, Some(1));
    }

    #[test]
    fn key_press_with_no_files_is_ignored() {
        let mut app = inspector_with_files(Vec::new());

        let _ = app.do_update(Message::KeyPressed(Key::Named(Named::ArrowDown)));

        assert_eq!(app.selected, None);
        assert!(matches!(app.display, FrameDisplay::Empty));
    }

    #[test]
    fn selection_out_of_range_is_ignored() {
        let mut app = inspector_with_files(vec![PathBuf::from("a.gif")]);

        let _ = app.do_update(Message::FileSelected(5));

        assert_eq!(app.selected, Some(0));
    }
}
