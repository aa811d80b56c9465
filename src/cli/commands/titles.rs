use crate::domain::TitleId;
use crate::services::CatalogError;
use crate::state::SharedState;

pub async fn cmd_list_titles(state: &SharedState) -> anyhow::Result<()> {
    let titles = state.catalog.list_titles().await?;

    if titles.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }

    println!("Titles ({} total)", titles.len());
    println!("{:-<70}", "");

    for title in titles {
        let year = title
            .release_year
            .map_or_else(|| "?".to_string(), |y| y.to_string());
        println!(
            "{:>5}  {} ({}) [{} views]",
            title.id, title.name, year, title.views
        );
    }

    Ok(())
}

pub async fn cmd_show_title(state: &SharedState, id: i32) -> anyhow::Result<()> {
    let details = match state.catalog.get_title(TitleId::new(id)).await {
        Ok(details) => details,
        Err(CatalogError::NotFound(_)) => {
            println!("Title with ID {id} not found.");
            println!("Use 'kuroneko titles' to see title IDs.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let title = &details.title;
    println!("{} (ID: {})", title.name, title.id);
    if let Some(alt) = &title.alt_name {
        println!("  Also known as: {alt}");
    }
    if !title.genres.is_empty() {
        println!("  Genres: {}", title.genres.join(", "));
    }
    println!("  Posted: {} | Views: {}", title.posted_at, title.views);
    println!();

    if details.episodes.is_empty() {
        println!("No episodes.");
        return Ok(());
    }

    for ep in &details.episodes {
        let marker = if ep.alert { "*" } else { " " };
        println!("{marker} S{:02}E{:02}  {}", ep.season, ep.number, ep.name);
    }

    Ok(())
}
