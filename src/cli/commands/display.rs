use crate::domain::TitleId;
use crate::state::SharedState;

pub async fn cmd_rebuild_display(state: &SharedState, id: i32) -> anyhow::Result<()> {
    let mirror = state.display.rebuild_from_catalog(TitleId::new(id)).await?;

    println!(
        "✓ Rebuilt display entry for '{}' ({} episodes)",
        mirror.name,
        mirror.episodes.len()
    );

    Ok(())
}

pub async fn cmd_clear_display(state: &SharedState) -> anyhow::Result<()> {
    println!("Remove every display mirror entry?");
    println!("Enter 'y' to confirm, anything else to cancel:");

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim().eq_ignore_ascii_case("y") {
        let cleared = state.display.clear_display_mirror().await?;
        println!("✓ Cleared {cleared} display entries");
    } else {
        println!("Cancelled.");
    }

    Ok(())
}
