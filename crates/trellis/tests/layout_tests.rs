//! Integration tests for measure and layout through the public `Ui` API.

use trellis::host::{HeadlessWindow, NativeEvent, WindowHostConfig};
use trellis::prelude::*;
use trellis::render::MeasureLength;

fn render_of(ui: &Ui, control: ControlId) -> RenderObjectId {
    ui.control(control).unwrap().root_render()
}

#[test]
fn test_border_wraps_child() {
    let mut ui = Ui::new();
    let border = ui.create_border(
        &BorderStyle::new()
            .with_thickness(Thickness::uniform(2.0))
            .with_border_color(Color::BLACK),
    );
    let border_render = render_of(&ui, border);
    ui.set_padding(border_render, Thickness::uniform(4.0)).unwrap();

    let child = ui.create_container();
    ui.set_preferred_size(render_of(&ui, child), MeasureSize::new(100.0, 20.0))
        .unwrap();
    ui.add_child(border, child, 0).unwrap();

    let size = ui.measure(
        border_render,
        &MeasureRequirement::with_max(MeasureSize::new(200.0, 200.0)),
        &MeasureSize::NOT_SPECIFIED,
    );
    assert_eq!(size, Size::new(112.0, 32.0));

    ui.layout(border_render, Point::ZERO);
    let child_base = ui.render_base(render_of(&ui, child)).unwrap();
    assert_eq!(child_base.offset(), Point::new(6.0, 6.0));
    assert_eq!(child_base.size(), Size::new(100.0, 20.0));
}

#[test]
fn test_measure_is_idempotent() {
    let mut ui = Ui::new();
    let outer = ui.create_container();
    let inner = ui.create_container();
    let outer_render = render_of(&ui, outer);
    ui.set_margin(outer_render, Thickness::new(1.0, 2.0, 3.0, 4.0)).unwrap();
    ui.set_preferred_size(render_of(&ui, inner), MeasureSize::new(40.0, 30.0))
        .unwrap();
    ui.add_child(outer, inner, 0).unwrap();

    let requirement = MeasureRequirement::with_max(MeasureSize::new(300.0, 300.0));
    let first = ui.measure(outer_render, &requirement, &MeasureSize::NOT_SPECIFIED);
    let second = ui.measure(outer_render, &requirement, &MeasureSize::NOT_SPECIFIED);
    assert_eq!(first, second);
}

#[test]
fn test_margin_and_padding_are_conserved() {
    let mut ui = Ui::new();
    let outer = ui.create_container();
    let inner = ui.create_container();
    let outer_render = render_of(&ui, outer);
    let margin = Thickness::new(3.0, 1.0, 5.0, 2.0);
    let padding = Thickness::symmetric(4.0, 6.0);
    ui.set_margin(outer_render, margin).unwrap();
    ui.set_padding(outer_render, padding).unwrap();
    ui.set_preferred_size(render_of(&ui, inner), MeasureSize::new(50.0, 10.0))
        .unwrap();
    ui.add_child(outer, inner, 0).unwrap();

    let size = ui.measure(
        outer_render,
        &MeasureRequirement::UNSPECIFIED,
        &MeasureSize::NOT_SPECIFIED,
    );
    assert_eq!(size.width, 50.0 + margin.horizontal_total() + padding.horizontal_total());
    assert_eq!(size.height, 10.0 + margin.vertical_total() + padding.vertical_total());
}

#[test]
fn test_oversized_space_is_clamped() {
    let mut ui = Ui::new();
    let control = ui.create_container();
    let render = render_of(&ui, control);
    ui.set_padding(render, Thickness::uniform(30.0)).unwrap();

    let requirement = MeasureRequirement::with_max(MeasureSize::new(40.0, 100.0));
    let size = ui.measure(render, &requirement, &MeasureSize::NOT_SPECIFIED);
    assert!(requirement.satisfy(size));
    assert_eq!(size, Size::new(40.0, 60.0));

    ui.layout(render, Point::ZERO);
    let base = ui.render_base(render).unwrap();
    assert!(base.content_rect().width() >= 0.0);
}

#[test]
fn test_custom_requirement_tightens() {
    let mut ui = Ui::new();
    let control = ui.create_container();
    let render = render_of(&ui, control);
    ui.set_preferred_size(render, MeasureSize::new(500.0, 500.0)).unwrap();
    ui.set_custom_requirement(
        render,
        MeasureRequirement::with_max(MeasureSize::from_lengths(
            MeasureLength::new(80.0),
            MeasureLength::NOT_SPECIFIED,
        )),
    )
    .unwrap();

    let size = ui.measure(
        render,
        &MeasureRequirement::with_max(MeasureSize::new(200.0, 200.0)),
        &MeasureSize::NOT_SPECIFIED,
    );
    assert_eq!(size, Size::new(80.0, 200.0));
}

#[test]
fn test_scroll_offset_stays_in_range() {
    let views = [Size::new(100.0, 50.0), Size::new(400.0, 400.0)];
    let requests = [
        Point::new(-10.0, -10.0),
        Point::new(50.0, 25.0),
        Point::new(1000.0, 1000.0),
    ];
    for view in views {
        let mut ui = Ui::new();
        let scroll = ui.create_scroll_view();
        let scroll_render = render_of(&ui, scroll);
        ui.set_preferred_size(scroll_render, view.into()).unwrap();
        let content = ui.create_container();
        ui.set_preferred_size(render_of(&ui, content), MeasureSize::new(300.0, 200.0))
            .unwrap();
        ui.add_child(scroll, content, 0).unwrap();
        ui.measure(
            scroll_render,
            &MeasureRequirement::UNSPECIFIED,
            &MeasureSize::NOT_SPECIFIED,
        );
        ui.layout(scroll_render, Point::ZERO);

        let max_x = (300.0 - view.width).max(0.0);
        let max_y = (200.0 - view.height).max(0.0);
        for request in requests {
            ui.set_scroll_offset(scroll_render, request).unwrap();
            let offset = ui.scroll_offset(scroll_render).unwrap();
            assert!((0.0..=max_x).contains(&offset.x), "{offset:?} for {view}");
            assert!((0.0..=max_y).contains(&offset.y), "{offset:?} for {view}");
        }
    }
}

#[test]
fn test_wheel_scrolls_through_host() {
    let mut ui = Ui::new();
    let host = ui.create_window(
        Some(Box::new(HeadlessWindow::new(Size::new(200.0, 100.0)))),
        WindowHostConfig::new(),
    );
    let root = ui.window_host(host).unwrap().root_control();

    let scroll = ui.create_scroll_view();
    let scroll_render = render_of(&ui, scroll);
    ui.set_preferred_size(scroll_render, MeasureSize::new(100.0, 50.0))
        .unwrap();
    let content = ui.create_container();
    ui.set_preferred_size(render_of(&ui, content), MeasureSize::new(300.0, 200.0))
        .unwrap();
    ui.add_child(scroll, content, 0).unwrap();
    ui.add_child(root, scroll, 0).unwrap();
    ui.process_all_tasks();

    let wheel = |delta| NativeEvent::MouseWheel {
        delta,
        point: Point::new(10.0, 10.0),
        modifiers: KeyModifiers::NONE,
    };
    ui.handle_native_event(host, wheel(1.0)).unwrap();
    assert_eq!(ui.scroll_offset(scroll_render).unwrap(), Point::new(0.0, 24.0));
    assert!(ui.window_host(host).unwrap().need_layout());
    ui.process_all_tasks();

    let content_base = ui.render_base(render_of(&ui, content)).unwrap();
    assert_eq!(content_base.offset(), Point::new(0.0, -24.0));

    ui.handle_native_event(host, wheel(-5.0)).unwrap();
    assert_eq!(ui.scroll_offset(scroll_render).unwrap(), Point::ZERO);

    ui.set_mouse_wheel_enabled(scroll_render, false).unwrap();
    ui.handle_native_event(host, wheel(1.0)).unwrap();
    assert_eq!(ui.scroll_offset(scroll_render).unwrap(), Point::ZERO);
}

#[test]
fn test_detached_mutations_schedule_nothing() {
    let mut ui = Ui::new();
    let control = ui.create_container();
    ui.set_padding(render_of(&ui, control), Thickness::uniform(2.0))
        .unwrap();
    assert!(!ui.has_pending_tasks());
}

fn hosted(ui: &mut Ui) -> ControlId {
    let host = ui.create_window(
        Some(Box::new(HeadlessWindow::new(Size::new(200.0, 100.0)))),
        WindowHostConfig::new(),
    );
    ui.window_host(host).unwrap().root_control()
}

#[test]
fn test_scroll_request_survives_content_growth() {
    let mut ui = Ui::new();
    let root = hosted(&mut ui);
    let scroll = ui.create_scroll_view();
    let scroll_render = render_of(&ui, scroll);
    ui.set_preferred_size(scroll_render, MeasureSize::new(100.0, 100.0))
        .unwrap();
    let content = ui.create_container();
    let content_render = render_of(&ui, content);
    ui.set_preferred_size(content_render, MeasureSize::new(100.0, 100.0))
        .unwrap();
    ui.add_child(scroll, content, 0).unwrap();
    ui.add_child(root, scroll, 0).unwrap();
    ui.process_all_tasks();

    ui.set_preferred_size(content_render, MeasureSize::new(100.0, 1000.0))
        .unwrap();
    assert_eq!(ui.set_scroll_offset(scroll_render, Point::new(0.0, 500.0)), Ok(false));
    ui.process_all_tasks();

    assert_eq!(ui.scroll_offset(scroll_render).unwrap(), Point::new(0.0, 500.0));
    assert_eq!(
        ui.render_base(content_render).unwrap().offset(),
        Point::new(0.0, -500.0)
    );

    ui.set_scroll_offset(scroll_render, Point::new(f32::NAN, f32::INFINITY))
        .unwrap();
    ui.process_all_tasks();
    assert_eq!(ui.scroll_offset(scroll_render).unwrap(), Point::new(0.0, 900.0));
    assert_eq!(
        ui.render_base(content_render).unwrap().offset(),
        Point::new(0.0, -900.0)
    );
}

#[test]
fn test_stack_alignment_setters_relayout() {
    let mut ui = Ui::new();
    let root = hosted(&mut ui);
    let host = ui.control_host(root).unwrap();
    let stack = ui.create_container();
    let stack_render = render_of(&ui, stack);
    ui.set_preferred_size(stack_render, MeasureSize::new(100.0, 60.0))
        .unwrap();
    let child = ui.create_container();
    let child_render = render_of(&ui, child);
    ui.set_preferred_size(child_render, MeasureSize::new(20.0, 20.0))
        .unwrap();
    ui.add_child(stack, child, 0).unwrap();
    ui.add_child(root, stack, 0).unwrap();
    ui.process_all_tasks();
    assert_eq!(ui.render_base(child_render).unwrap().offset(), Point::ZERO);

    ui.set_stack_default_alignment(stack_render, Alignment::uniform(Align::Center))
        .unwrap();
    assert!(ui.window_host(host).unwrap().need_layout());
    ui.process_all_tasks();
    assert_eq!(
        ui.render_base(child_render).unwrap().offset(),
        Point::new(40.0, 20.0)
    );

    ui.set_stack_child_alignment(stack_render, 0, Some(Alignment::uniform(Align::End)))
        .unwrap();
    assert!(ui.window_host(host).unwrap().need_layout());
    ui.process_all_tasks();
    assert_eq!(
        ui.render_base(child_render).unwrap().offset(),
        Point::new(80.0, 40.0)
    );

    let scroll = ui.create_scroll_view();
    assert!(matches!(
        ui.set_stack_default_alignment(render_of(&ui, scroll), Alignment::default()),
        Err(UiError::WrongRenderObjectType { .. })
    ));
}

#[test]
fn test_flex_layout_expands_through_host() {
    let mut ui = Ui::new();
    let root = hosted(&mut ui);
    let flex = ui.create_flex_layout();
    let flex_render = render_of(&ui, flex);
    ui.set_preferred_size(flex_render, MeasureSize::new(100.0, 10.0))
        .unwrap();
    let children: Vec<_> = (0..2)
        .map(|index| {
            let child = ui.create_container();
            ui.set_preferred_size(render_of(&ui, child), MeasureSize::new(20.0, 10.0))
                .unwrap();
            ui.add_child(flex, child, index).unwrap();
            render_of(&ui, child)
        })
        .collect();
    ui.add_child(root, flex, 0).unwrap();
    ui.set_flex_child_layout_data(
        flex_render,
        1,
        FlexChildLayoutData::default().with_expand_factor(1.0),
    )
    .unwrap();
    ui.process_all_tasks();

    let second = ui.render_base(children[1]).unwrap();
    assert_eq!(second.offset(), Point::new(20.0, 0.0));
    assert_eq!(second.size(), Size::new(80.0, 10.0));

    ui.set_flex_direction(flex_render, FlexDirection::HorizontalReverse)
        .unwrap();
    ui.process_all_tasks();
    assert_eq!(
        ui.render_base(children[0]).unwrap().offset(),
        Point::new(80.0, 0.0)
    );
    assert_eq!(ui.render_base(children[1]).unwrap().offset(), Point::ZERO);
}
