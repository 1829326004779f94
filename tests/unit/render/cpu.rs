use super::*;

#[test]
fn clear_fills_every_pixel() {
    let mut backend = CpuBackend::default();
    let mut list = DisplayList::new();
    list.clear(Color::rgb(10, 20, 30));
    let frame = backend
        .render(&list, &Viewport::new(8.0, 4.0, 1.0))
        .unwrap();
    assert_eq!((frame.width, frame.height), (8, 4));
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 8 * 4 * 4);
    assert_eq!(frame.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(frame.pixel(7, 3), Some([10, 20, 30, 255]));
}

#[test]
fn device_pixel_ratio_scales_the_buffer() {
    let mut backend = CpuBackend::default();
    let mut list = DisplayList::new();
    list.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Paint::Solid(Color::WHITE));
    let frame = backend
        .render(&list, &Viewport::new(10.0, 10.0, 2.0))
        .unwrap();
    assert_eq!((frame.width, frame.height), (20, 20));
    assert_eq!(frame.pixel(2, 2), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(15, 15), Some([0, 0, 0, 0]));
}

#[test]
fn zero_sized_viewport_is_surface_unavailable() {
    let mut backend = CpuBackend::default();
    let err = backend
        .render(&DisplayList::new(), &Viewport::new(0.0, 10.0, 1.0))
        .unwrap_err();
    assert!(matches!(err, SceneError::SurfaceUnavailable(_)));
}

#[test]
fn vertical_gradient_darkens_towards_the_bottom() {
    let mut backend = CpuBackend::default();
    let mut list = DisplayList::new();
    list.fill_rect(
        Rect::new(0.0, 0.0, 4.0, 32.0),
        Paint::vertical(0.0, 32.0, Color::WHITE, Color::BLACK),
    );
    let frame = backend
        .render(&list, &Viewport::new(4.0, 32.0, 1.0))
        .unwrap();
    let top = frame.pixel(1, 0).unwrap();
    let bottom = frame.pixel(1, 31).unwrap();
    assert!(top[0] > 200, "top {top:?}");
    assert!(bottom[0] < 50, "bottom {bottom:?}");
    assert_eq!(backend.cached_gradients(), 1);

    // Same frame again hits the cache.
    let again = backend
        .render(&list, &Viewport::new(4.0, 32.0, 1.0))
        .unwrap();
    assert_eq!(again, frame);
    assert_eq!(backend.cached_gradients(), 1);
}

#[test]
fn unbalanced_layers_are_closed() {
    let mut backend = CpuBackend::default();
    let mut list = DisplayList::new();
    list.push_opacity(0.5);
    list.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Paint::Solid(Color::WHITE));
    let frame = backend
        .render(&list, &Viewport::new(4.0, 4.0, 1.0))
        .unwrap();
    let px = frame.pixel(1, 1).unwrap();
    assert!(px[3] > 100 && px[3] < 155, "{px:?}");
}

#[test]
fn strokes_are_rasterized() {
    let mut backend = CpuBackend::default();
    let mut list = DisplayList::new();
    list.stroke_line(
        Point::new(0.0, 8.0),
        Point::new(16.0, 8.0),
        4.0,
        Color::WHITE,
    );
    let frame = backend
        .render(&list, &Viewport::new(16.0, 16.0, 1.0))
        .unwrap();
    assert_eq!(frame.pixel(8, 8).map(|p| p[3]), Some(255));
    assert_eq!(frame.pixel(8, 0).map(|p| p[3]), Some(0));
}

#[test]
fn to_straight_unpremultiplies() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
        premultiplied: true,
    };
    let s = frame.to_straight();
    assert!(!s.premultiplied);
    assert_eq!(s.data, vec![128, 0, 0, 128]);
}
