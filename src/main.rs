use anyhow::Result;
use page_composer::{
    Composer, ComposerConfig, DropCandidate, DropTarget, LayoutKind, Outcome, Point, Rect,
    ValidatedCanvas, WidgetType,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => ComposerConfig::load(&path)?,
        None => ComposerConfig::default(),
    };

    println!("Page Composer");
    println!("=============\n");

    let mut composer = Composer::new(config);

    // Lay out two sections
    let hero = composer
        .store_mut()
        .create_section_with_layout(LayoutKind::FullWidth)
        .created_id();
    let columns = composer
        .store_mut()
        .create_section_with_layout(LayoutKind::TwoColumns)
        .created_id();

    println!("✓ Created sections");
    println!("  Items: {}", composer.store().len());

    // Drag a heading from the library onto the canvas background
    composer.start_library_drag(WidgetType::Heading);
    composer.on_drag_over(
        Point::new(10.0, 900.0),
        vec![DropCandidate::new(
            DropTarget::Canvas,
            Rect::new(0.0, 0.0, 800.0, 1000.0),
        )],
    );
    let heading = composer.on_drag_end().created_id();
    println!("\n✓ Dropped a standalone heading: {:?}", heading);

    // Drag an image into the right column
    if let Some(section) = columns.and_then(|id| composer.store().find_section(id)) {
        let candidates: Vec<DropCandidate> = section
            .areas
            .iter()
            .enumerate()
            .map(|(i, area)| {
                DropCandidate::new(
                    DropTarget::SectionArea {
                        section_id: section.id,
                        area_id: area.id,
                    },
                    Rect::new(i as f32 * 400.0, 200.0, 400.0, 300.0),
                )
            })
            .collect();

        composer.start_library_drag(WidgetType::Image);
        composer.on_drag_over(Point::new(600.0, 300.0), candidates);
        let outcome = composer.on_drag_end();
        println!("\n✓ Dropped an image into the right column: {:?}", outcome);
    }

    // Move the heading to the top
    if let Some(heading) = heading {
        composer.start_canvas_drag(heading);
        let target = hero.map(|id| DropTarget::Section { section_id: id });
        if let Some(target) = target {
            composer.on_drag_over(
                Point::new(50.0, 50.0),
                vec![DropCandidate::new(target, Rect::new(0.0, 0.0, 800.0, 100.0))],
            );
        }
        if composer.on_drag_end() == Outcome::Applied {
            println!("\n✓ Moved the heading above the hero section");
        }
    }

    println!("\n📄 Page Outline:");
    print!("{}", composer.store().outline());

    let validation = composer.store().validate();
    println!("\n🔍 Validation: {}", if validation.is_valid() { "clean" } else { "issues found" });
    println!("  └─ Widgets: {}", composer.store().widget_count());
    println!("  └─ Revision: {}", composer.store().revision());
    println!("  └─ Events logged: {}", composer.store().events().len());
    let structural = composer
        .store()
        .events()
        .iter()
        .filter(|event| event.is_structural())
        .count();
    println!("  └─ Structural changes: {}", structural);

    Ok(())
}
