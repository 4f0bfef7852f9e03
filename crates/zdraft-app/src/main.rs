//! ZDraft 无界面驱动程序
//!
//! 从脚本（文件参数或标准输入）逐行回放指针与命令行输入：
//!
//! ```text
//! tool circle2pr      # 激活工具（命令名或快捷键）
//! move 4,0            # 鼠标移动
//! click 2,5           # 左键释放
//! rclick              # 右键释放
//! esc                 # 取消
//! radius 2.5          # 其他行作为命令行输入
//! ```
//!
//! 结束时保存工具设置，并把文档中的实体以 JSON 输出到标准输出。

use anyhow::{bail, Context, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use zdraft_core::document::Document;
use zdraft_core::input_parser::{InputParser, InputValue};
use zdraft_core::math::Point2;
use zdraft_ui::{ActionHost, CursorShape, HintSink, MouseButton, PointerEvent, PreviewGeometry, PreviewSink, Settings};

/// 日志级别环境变量
const LOG_ENV: &str = "ZDRAFT_LOG";
/// 设置文件路径环境变量
const SETTINGS_ENV: &str = "ZDRAFT_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "zdraft-settings.json";

/// 把预览和提示写进日志的视图
#[derive(Default)]
struct ConsoleView {
    last_prompt: String,
}

impl PreviewSink for ConsoleView {
    fn draw_preview(&mut self, previews: &[PreviewGeometry]) {
        tracing::trace!("Preview: {} item(s)", previews.len());
    }
}

impl HintSink for ConsoleView {
    fn update_mouse_button_hints(&mut self, prompt: &str, commands: &[&'static str]) {
        if prompt != self.last_prompt {
            info!("{} {:?}", prompt, commands);
            self.last_prompt = prompt.to_string();
        }
    }

    fn update_mouse_cursor(&mut self, cursor: CursorShape) {
        tracing::trace!("Cursor: {:?}", cursor);
    }
}

/// 脚本中的一行
#[derive(Debug, Clone, PartialEq)]
enum ScriptLine {
    Tool(String),
    Move(Point2),
    Click(Point2),
    RightClick(Point2),
    Escape,
    Input(String),
}

/// 解析脚本坐标（只接受绝对坐标）
fn parse_point(text: &str) -> Result<Point2> {
    match InputParser::parse(text)? {
        InputValue::Coordinate { point, relative: false } => Ok(point),
        other => bail!("expected an absolute coordinate, got {:?}", other),
    }
}

fn parse_line(line: &str) -> Result<Option<ScriptLine>> {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
    .trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let parsed = match head.to_ascii_lowercase().as_str() {
        "tool" => ScriptLine::Tool(rest.to_string()),
        "move" => ScriptLine::Move(parse_point(rest)?),
        "click" => ScriptLine::Click(parse_point(rest)?),
        "rclick" if rest.is_empty() => ScriptLine::RightClick(Point2::origin()),
        "rclick" => ScriptLine::RightClick(parse_point(rest)?),
        "esc" | "escape" => ScriptLine::Escape,
        _ => ScriptLine::Input(line.to_string()),
    };
    Ok(Some(parsed))
}

/// 回放脚本
fn run_script(reader: impl Read, host: &mut ActionHost, doc: &mut Document, view: &mut ConsoleView) -> Result<()> {
    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let number = index + 1;
        let line = line.with_context(|| format!("failed to read script line {number}"))?;
        let Some(step) = parse_line(&line).with_context(|| format!("line {number}: {line:?}"))? else {
            continue;
        };

        // 被拒绝的输入不影响状态，记录后继续
        let outcome = match step {
            ScriptLine::Tool(name) => host.activate_by_name(&name, view).map(|_| Vec::new()),
            ScriptLine::Move(p) => host.pointer_moved(&PointerEvent::new(p), view).map(|_| Vec::new()),
            ScriptLine::Click(p) => host.pointer_released(&PointerEvent::new(p), MouseButton::Left, doc, view),
            ScriptLine::RightClick(p) => {
                host.pointer_released(&PointerEvent::new(p), MouseButton::Right, doc, view)
            }
            ScriptLine::Escape => {
                host.escape(view);
                Ok(Vec::new())
            }
            ScriptLine::Input(text) => host.command_line(&text, doc, view),
        };
        match outcome {
            Ok(ids) => {
                for id in ids {
                    info!("Created entity {}", id);
                }
            }
            Err(e) => warn!("line {}: {}", number, e),
        }
    }
    Ok(())
}

fn log_level() -> Level {
    match std::env::var(LOG_ENV) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            eprintln!("Invalid {LOG_ENV}={value:?}, using info");
            Level::INFO
        }),
        Err(_) => Level::INFO,
    }
}

fn main() -> Result<()> {
    // 初始化日志（输出到 stderr，stdout 留给 JSON）
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(log_level())
            .with_writer(std::io::stderr)
            .finish(),
    )?;

    info!("Starting ZDraft...");

    let settings_path = std::env::var_os(SETTINGS_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = Settings::load(&settings_path)
        .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;

    let mut host = ActionHost::new(settings);
    let mut doc = Document::new();
    let mut view = ConsoleView::default();

    match std::env::args_os().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            let file = std::fs::File::open(&path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            run_script(file, &mut host, &mut doc, &mut view)?;
        }
        None => run_script(std::io::stdin().lock(), &mut host, &mut doc, &mut view)?,
    }

    host.deactivate(&mut view);
    host.settings()
        .save(&settings_path)
        .with_context(|| format!("failed to save settings to {}", settings_path.display()))?;

    info!("{} entities", doc.entity_count());
    println!("{}", serde_json::to_string_pretty(doc.entities())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zdraft_core::geometry::Geometry;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("  # comment").unwrap(), None);
        assert_eq!(parse_line("tool pl").unwrap(), Some(ScriptLine::Tool("pl".into())));
        assert_eq!(
            parse_line("click 2, 5 # release").unwrap(),
            Some(ScriptLine::Click(Point2::new(2.0, 5.0)))
        );
        assert_eq!(parse_line("rclick").unwrap(), Some(ScriptLine::RightClick(Point2::origin())));
        assert_eq!(parse_line("ESC").unwrap(), Some(ScriptLine::Escape));
        assert_eq!(parse_line("radius 2.5").unwrap(), Some(ScriptLine::Input("radius 2.5".into())));
        assert!(parse_line("click @1,1").is_err());
        assert!(parse_line("move 3").is_err());
    }

    #[test]
    fn test_run_script() {
        let script = "\
tool circle2pr
radius 2.5
click 0,0
move 4,0
click 4,0
click 2,5
zoom 3
tool line
0,0
@3,4
";
        let mut host = ActionHost::new(Settings::new());
        let mut doc = Document::new();
        let mut view = ConsoleView::default();
        run_script(script.as_bytes(), &mut host, &mut doc, &mut view).unwrap();

        assert_eq!(doc.entity_count(), 2);
        assert!(matches!(doc.entities()[0].geometry, Geometry::Circle(_)));
        assert!(matches!(doc.entities()[1].geometry, Geometry::Line(_)));
    }
}
