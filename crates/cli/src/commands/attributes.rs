//! Variation (attribute) commands.

use vendor_desk_admin::ConsoleError;
use vendor_desk_admin::ConsoleState;
use vendor_desk_admin::editor::FlashLevel;
use vendor_desk_admin::screens::AttributesScreen;
use vendor_desk_core::types::{Attribute, AttributeId, CategoryId};

#[allow(clippy::print_stdout)]
pub async fn list(state: &ConsoleState) -> Result<(), ConsoleError> {
    let mut screen = AttributesScreen::new(state.editor_settings());
    screen.load(state.client()).await?;

    if screen.items().is_empty() {
        println!("No variations yet.");
    }
    for attribute in screen.items() {
        let id = attribute.id.as_ref().map_or("-", AttributeId::as_str);
        println!(
            "{id:<8} {:<20} {:<16} {}",
            attribute.name,
            attribute.group,
            attribute.values.join(", ")
        );
    }
    Ok(())
}

/// Create a variation and link it to `categories`.
///
/// A failed link leaves the variation in place and is printed as a warning.
#[allow(clippy::print_stdout)]
pub async fn create(
    state: &ConsoleState,
    name: &str,
    group: &str,
    values: &str,
    categories: &[CategoryId],
) -> Result<(), ConsoleError> {
    let mut screen = AttributesScreen::new(state.editor_settings());
    let editor = screen.editor_mut();
    editor.open_create(Attribute::draft(name, group))?;
    editor.edit(|draft| draft.set_values_from_input(values))?;

    let created = screen
        .create_with_categories(state.client(), categories)
        .await?;

    if let Some(attribute) = created {
        let id = attribute.id.as_ref().map_or("-", AttributeId::as_str);
        println!("Created variation {} ({id})", attribute.name);
    }
    let warning = screen
        .editor()
        .flash()
        .current()
        .filter(|flash| flash.level == FlashLevel::Warning);
    if let Some(flash) = warning {
        println!("Warning: {}", flash.message);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn delete(state: &ConsoleState, id: &AttributeId) -> Result<(), ConsoleError> {
    let mut screen = AttributesScreen::new(state.editor_settings());
    screen.load(state.client()).await?;
    if screen.editor().find(id).is_none() {
        return Err(ConsoleError::NotFound(format!("Variation {id}")));
    }

    screen.delete(state.client(), id).await?;
    println!("Deleted variation {id}");
    Ok(())
}
