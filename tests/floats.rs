mod common;

use common::*;
use folio_pdf::{
    ContentNode, FloatMode, FontState, FontWeight, HeadingLevel, ImageAttrs, MemoryImageResolver,
    Options, PX_TO_MM,
};

const DEFAULT_MARGIN: f32 = 2.0;

fn resolver() -> MemoryImageResolver {
    MemoryImageResolver::new()
        .with("square.png", bitmap(200, 200))
        .with("small.png", bitmap(100, 100))
        .with("banner.png", bitmap(100, 40))
}

fn side(mode: FloatMode, source: &str) -> ContentNode {
    ContentNode::image(ImageAttrs::new(source).float(mode))
}

#[test]
fn left_float_narrows_lines_until_its_bottom_edge() {
    let root = ContentNode::container(vec![
        side(FloatMode::Left, "square.png"),
        ContentNode::paragraph(words("reflow", 250)),
    ]);
    let (pages, report) = layout(&root, &Options::default(), &resolver());
    assert_eq!(report.page_count, 1);

    let w = 200.0 * PX_TO_MM;
    let end_y = CONTENT_START_Y + w + DEFAULT_MARGIN;
    let beside_x = MARGIN + w + DEFAULT_MARGIN;

    let placed = images(&pages[0]);
    assert_eq!(placed.len(), 1);
    assert!(approx(placed[0].0, MARGIN));
    assert!(approx(placed[0].1, CONTENT_START_Y));

    let body = body_texts(&pages[0]);
    // Floats do not move the cursor: the first line sits beside the image.
    assert!(approx(body[0].y, CONTENT_START_Y));
    let mut beside = 0;
    let mut below = 0;
    for line in &body {
        if line.y < end_y {
            assert!(approx(line.x, beside_x), "line at {} should be shifted", line.y);
            beside += 1;
        } else {
            assert!(approx(line.x, MARGIN), "line at {} should be full width", line.y);
            below += 1;
        }
    }
    assert!(beside > 0 && below > 0);
}

#[test]
fn right_float_keeps_left_edge_and_narrows_width() {
    let root = ContentNode::container(vec![
        side(FloatMode::Right, "square.png"),
        ContentNode::paragraph(words("reflow", 250)),
    ]);
    let (pages, _) = layout(&root, &Options::default(), &resolver());

    let w = 200.0 * PX_TO_MM;
    let end_y = CONTENT_START_Y + w + DEFAULT_MARGIN;
    let narrowed = 180.0 - (w + DEFAULT_MARGIN);

    let placed = images(&pages[0]);
    assert!(approx(placed[0].0, 210.0 - MARGIN - w));

    let font = FontState::new(BODY_SIZE, FontWeight::Normal);
    let body = body_texts(&pages[0]);
    for line in &body {
        assert!(approx(line.x, MARGIN));
        if line.y < end_y {
            assert!(font.text_width(line.text) <= narrowed + 1e-3);
        }
    }
    let widest_below = body
        .iter()
        .filter(|l| l.y >= end_y)
        .map(|l| font.text_width(l.text))
        .fold(0.0f32, f32::max);
    assert!(widest_below > narrowed);
}

#[test]
fn custom_margin_widens_the_float_region() {
    let mut attrs = ImageAttrs::new("square.png").float(FloatMode::Left);
    attrs.margin_right = Some(20.0);
    attrs.margin_bottom = Some(40.0);
    let root = ContentNode::container(vec![
        ContentNode::image(attrs),
        ContentNode::paragraph(words("reflow", 200)),
    ]);
    let (pages, _) = layout(&root, &Options::default(), &resolver());

    let w = 200.0 * PX_TO_MM;
    let end_y = CONTENT_START_Y + w + 40.0 * PX_TO_MM;
    for line in body_texts(&pages[0]) {
        let expected = if line.y < end_y {
            MARGIN + w + 20.0 * PX_TO_MM
        } else {
            MARGIN
        };
        assert!(approx(line.x, expected));
    }
}

#[test]
fn page_break_clears_the_float() {
    // 17 one-line paragraphs put the cursor at 40 + 17 * 9 = 193.
    let mut children: Vec<ContentNode> = (0..17).map(|_| ContentNode::paragraph("x")).collect();
    children.push(side(FloatMode::Left, "square.png"));
    children.push(ContentNode::paragraph(words("reflow", 150)));
    let (pages, report) = layout(
        &ContentNode::container(children),
        &Options::default(),
        &resolver(),
    );
    assert_eq!(report.page_count, 2);

    let placed = images(&pages[0]);
    assert!(approx(placed[0].1, 193.0));

    let beside_x = MARGIN + 200.0 * PX_TO_MM + DEFAULT_MARGIN;
    let first_page_reflow: Vec<_> = body_texts(&pages[0])
        .into_iter()
        .filter(|t| t.text != "x")
        .collect();
    assert!(!first_page_reflow.is_empty());
    assert!(first_page_reflow.iter().all(|t| approx(t.x, beside_x)));

    let second_page = body_texts(&pages[1]);
    assert!(!second_page.is_empty());
    assert!(second_page.iter().all(|t| approx(t.x, MARGIN)));
}

#[test]
fn second_float_replaces_the_first() {
    let root = ContentNode::container(vec![
        side(FloatMode::Left, "square.png"),
        side(FloatMode::Right, "small.png"),
        ContentNode::paragraph(words("reflow", 120)),
    ]);
    let (pages, _) = layout(&root, &Options::default(), &resolver());

    assert_eq!(images(&pages[0]).len(), 2);
    // Only the right float is honoured, so no line is pushed right.
    assert!(body_texts(&pages[0]).iter().all(|t| approx(t.x, MARGIN)));
}

#[test]
fn lists_and_headings_ignore_floats() {
    let root = ContentNode::container(vec![
        side(FloatMode::Left, "square.png"),
        ContentNode::heading(HeadingLevel::H2, "Beside the picture"),
        ContentNode::list(false, ["first", "second"]),
    ]);
    let (pages, _) = layout(&root, &Options::default(), &resolver());
    let all = texts(&pages[0]);

    let heading = all.iter().find(|t| t.text == "Beside the picture").unwrap();
    assert!(approx(heading.x, MARGIN));
    assert!(approx(heading.y, CONTENT_START_Y + 3.0));

    let body = body_texts(&pages[0]);
    let markers: Vec<_> = body.iter().filter(|t| t.text == "\u{2022}").collect();
    assert_eq!(markers.len(), 2);
    assert!(markers.iter().all(|t| approx(t.x, MARGIN + 2.0)));
    let items: Vec<_> = body.iter().filter(|t| t.text != "\u{2022}").collect();
    assert!(items.iter().all(|t| approx(t.x, MARGIN + 10.0)));
}

#[test]
fn bare_text_reflows_like_a_paragraph() {
    let root = ContentNode::container(vec![
        side(FloatMode::Left, "square.png"),
        ContentNode::text("loose text"),
    ]);
    let (pages, _) = layout(&root, &Options::default(), &resolver());
    let run = texts(&pages[0])
        .into_iter()
        .find(|t| t.text == "loose text")
        .unwrap();
    assert!(approx(run.x, MARGIN + 200.0 * PX_TO_MM + DEFAULT_MARGIN));
}

#[test]
fn block_image_clears_the_float() {
    let root = ContentNode::container(vec![
        side(FloatMode::Left, "square.png"),
        ContentNode::image(ImageAttrs::new("banner.png")),
        ContentNode::paragraph("after the banner"),
    ]);
    let (pages, _) = layout(&root, &Options::default(), &resolver());

    let placed = images(&pages[0]);
    assert_eq!(placed.len(), 2);
    let banner = placed[1];
    assert!(approx(banner.0, MARGIN + (180.0 - banner.2) / 2.0));
    assert!(approx(banner.1, CONTENT_START_Y));

    let after = body_texts(&pages[0])
        .into_iter()
        .find(|t| t.text == "after the banner")
        .unwrap();
    assert!(approx(after.y, CONTENT_START_Y + 40.0 * PX_TO_MM + 5.0));
    assert!(approx(after.x, MARGIN));
}

#[test]
fn floating_image_is_capped_at_half_the_usable_width() {
    let wide = MemoryImageResolver::new().with("wide.png", bitmap(800, 400));
    let root = side(FloatMode::Left, "wide.png");
    let (pages, _) = layout(&root, &Options::default(), &wide);
    let (_, _, w, h) = images(&pages[0])[0];
    assert!(approx(w, 90.0));
    assert!(approx(h, 45.0));
}
