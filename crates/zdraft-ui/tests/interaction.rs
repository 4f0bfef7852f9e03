//! 端到端交互测试：宿主 + 文档 + 记录视图

use approx::assert_relative_eq;
use zdraft_core::document::Document;
use zdraft_core::geometry::Geometry;
use zdraft_core::layer::Layer;
use zdraft_core::math::Point2;
use zdraft_ui::settings::keys;
use zdraft_ui::{
    ActionError, ActionHost, ActionType, CursorShape, HintSink, MouseButton, PointerEvent, PreviewGeometry,
    PreviewSink, Settings,
};

#[derive(Default)]
struct RecordingView {
    previews: Vec<PreviewGeometry>,
    preview_calls: usize,
    prompt: String,
    commands: Vec<&'static str>,
    cursor: Option<CursorShape>,
}

impl PreviewSink for RecordingView {
    fn draw_preview(&mut self, previews: &[PreviewGeometry]) {
        self.previews = previews.to_vec();
        self.preview_calls += 1;
    }
}

impl HintSink for RecordingView {
    fn update_mouse_button_hints(&mut self, prompt: &str, commands: &[&'static str]) {
        self.prompt = prompt.to_string();
        self.commands = commands.to_vec();
    }

    fn update_mouse_cursor(&mut self, cursor: CursorShape) {
        self.cursor = Some(cursor);
    }
}

struct Session {
    host: ActionHost,
    doc: Document,
    view: RecordingView,
}

impl Session {
    fn new(settings: Settings) -> Self {
        Self {
            host: ActionHost::new(settings),
            doc: Document::new(),
            view: RecordingView::default(),
        }
    }

    fn tool(&mut self, action_type: ActionType) {
        self.host.activate(action_type, &mut self.view);
    }

    fn type_line(&mut self, text: &str) -> Result<usize, ActionError> {
        self.host
            .command_line(text, &mut self.doc, &mut self.view)
            .map(|ids| ids.len())
    }

    fn hover(&mut self, x: f64, y: f64) {
        self.host
            .pointer_moved(&PointerEvent::at(x, y), &mut self.view)
            .unwrap();
    }

    fn click(&mut self, x: f64, y: f64) -> usize {
        self.host
            .pointer_released(&PointerEvent::at(x, y), MouseButton::Left, &mut self.doc, &mut self.view)
            .unwrap()
            .len()
    }

    fn last_geometry(&self) -> &Geometry {
        &self.doc.entities().last().unwrap().geometry
    }
}

#[test]
fn test_circle_2pr_selects_center_nearest_release() {
    let mut s = Session::new(Settings::new());
    s.tool(ActionType::DrawCircle2PR);
    s.type_line("radius 2.5").unwrap();
    s.click(0.0, 0.0);

    // 两个候选都在预览中
    s.hover(4.0, 0.0);
    assert!(s.view.preview_calls > 0);
    let circles = s
        .view
        .previews
        .iter()
        .filter(|p| matches!(p.geometry, Geometry::Circle(_)))
        .count();
    assert_eq!(circles, 2);

    assert_eq!(s.click(4.0, 0.0), 0);
    assert_eq!(s.view.cursor, Some(CursorShape::Select));
    assert!(s.view.commands.is_empty());

    assert_eq!(s.click(2.0, 5.0), 1);
    let Geometry::Circle(circle) = s.last_geometry() else {
        panic!("Expected circle");
    };
    assert_relative_eq!(circle.center.x, 2.0);
    assert_relative_eq!(circle.center.y, 1.5);
    assert_relative_eq!(circle.radius, 2.5);

    // 工具可重复使用
    assert_eq!(s.host.active_type(), Some(ActionType::DrawCircle2PR));
    assert_eq!(s.view.commands, vec!["radius"]);
    assert_eq!(s.view.cursor, Some(CursorShape::CrossHair));
}

#[test]
fn test_circle_2pr_without_solution_emits_nothing() {
    let mut s = Session::new(Settings::new());
    s.tool(ActionType::DrawCircle2PR);
    s.type_line("2").unwrap();
    s.type_line("0,0").unwrap();
    s.hover(5.0, 0.0);
    assert!(s.view.previews.is_empty());
    assert_eq!(s.type_line("5,0").unwrap(), 0);
    assert_eq!(s.doc.entity_count(), 0);

    // 调整第二点后可以继续
    assert_eq!(s.type_line("@4,0").unwrap(), 1);
    let Geometry::Circle(circle) = s.last_geometry() else {
        panic!("Expected circle");
    };
    assert_eq!(circle.center, Point2::new(2.0, 0.0));
}

#[test]
fn test_polyline_mixed_segments() {
    let mut s = Session::new(Settings::new());
    s.tool(ActionType::DrawPolyline);
    s.type_line("0,0").unwrap();
    s.type_line("@1,0").unwrap();
    s.type_line("tang").unwrap();
    s.type_line("2,1").unwrap();
    s.type_line("line").unwrap();
    s.type_line("2,3").unwrap();
    assert_eq!(s.type_line("finish").unwrap(), 1);

    let Geometry::Polyline(polyline) = s.last_geometry() else {
        panic!("Expected polyline");
    };
    assert_eq!(polyline.vertex_count(), 4);
    assert!(!polyline.closed);
    let pieces = polyline.explode();
    assert!(matches!(pieces[0], Geometry::Line(_)));
    assert!(matches!(pieces[1], Geometry::Arc(_)));
    assert!(matches!(pieces[2], Geometry::Line(_)));
    // 1 + 四分之一圆周 + 2
    assert_relative_eq!(polyline.length(), 3.0 + std::f64::consts::FRAC_PI_2, epsilon = 1e-9);
}

#[test]
fn test_polyline_options_round_trip_through_settings() {
    let mut settings = Settings::new();
    settings.write_entry(keys::POLYLINE_MODE, 3);
    settings.write_entry(keys::POLYLINE_ANGLE, "90");

    let mut s = Session::new(settings);
    s.tool(ActionType::DrawPolyline);
    assert!(s.view.commands.contains(&"angle"));
    s.type_line("0,0").unwrap();
    s.type_line("0.5,3").unwrap();
    s.type_line("angle 45").unwrap();
    s.host.deactivate(&mut s.view);

    assert_eq!(s.host.settings().read_entry(keys::POLYLINE_ANGLE, "180.0"), "45");
    assert_eq!(s.host.settings().read_num_entry(keys::POLYLINE_MODE, 0), 3);
    assert!(s.view.previews.is_empty());
}

#[test]
fn test_entities_take_current_layer() {
    let mut s = Session::new(Settings::new());
    s.doc.layers_mut().add(Layer::new("walls"));
    assert!(s.doc.layers_mut().activate("walls"));

    s.tool(ActionType::DrawLine);
    s.type_line("0,0").unwrap();
    s.type_line("10<90").unwrap();
    let entity = s.doc.entities().last().unwrap();
    assert_eq!(entity.layer, "walls");
}

#[test]
fn test_invalid_input_never_mutates() {
    let mut s = Session::new(Settings::new());
    s.tool(ActionType::DrawPolyline);
    s.type_line("0,0").unwrap();
    let prompt = s.view.prompt.clone();

    assert!(matches!(s.type_line("(1+2"), Err(ActionError::Parse(_))));
    assert!(matches!(s.type_line("ta"), Err(ActionError::AmbiguousCommand { .. })));
    assert!(matches!(s.type_line("close"), Err(ActionError::UnknownCommand(_))));
    assert!(matches!(s.type_line("@"), Err(ActionError::Parse(_))));
    assert_eq!(s.view.prompt, prompt);
    assert_eq!(s.doc.entity_count(), 0);
}

#[test]
fn test_escape_discards_partial_input() {
    let mut s = Session::new(Settings::new());
    s.tool(ActionType::DrawArc);
    s.click(1.0, 0.0);
    s.click(0.0, 1.0);
    s.type_line("cancel").unwrap();
    s.click(5.0, 5.0);
    s.click(6.0, 6.0);
    // 三点共线，不提交
    assert_eq!(s.click(7.0, 7.0), 0);
    assert_eq!(s.doc.entity_count(), 0);
}

#[test]
fn test_huge_radius_commits_only_finite_circle() {
    let mut s = Session::new(Settings::new());
    s.tool(ActionType::DrawCircle2PR);
    s.type_line("radius 1e200").unwrap();
    s.type_line("0,0").unwrap();
    s.type_line("4,0").unwrap();
    assert_eq!(s.click(2.0, 5.0), 1);
    let Geometry::Circle(circle) = s.last_geometry() else {
        panic!("Expected circle");
    };
    assert!(circle.center.x.is_finite() && circle.center.y.is_finite());
    assert_relative_eq!(circle.center.x, 2.0);
}

#[test]
fn test_polyline_closed_at_start_has_no_zero_length_segment() {
    let mut s = Session::new(Settings::new());
    s.tool(ActionType::DrawPolyline);
    for input in ["0,0", "1,0", "1,1", "0,0"] {
        s.type_line(input).unwrap();
    }
    assert_eq!(s.type_line("close").unwrap(), 1);

    let Geometry::Polyline(polyline) = s.last_geometry() else {
        panic!("Expected polyline");
    };
    assert!(polyline.closed);
    for piece in polyline.explode() {
        let Geometry::Line(line) = piece else {
            panic!("Expected straight segments");
        };
        assert!(line.length() > 0.0);
    }
}

#[test]
fn test_deeply_nested_input_is_rejected() {
    let mut s = Session::new(Settings::new());
    s.tool(ActionType::DrawCircle);
    let deep = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
    assert!(matches!(s.type_line(&deep), Err(ActionError::Parse(_))));
    assert_eq!(s.doc.entity_count(), 0);
}
