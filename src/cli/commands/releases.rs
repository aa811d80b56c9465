use crate::domain::TitleId;
use crate::state::SharedState;

pub async fn cmd_today(state: &SharedState) -> anyhow::Result<()> {
    let episodes = state.alerts.released_today().await?;

    if episodes.is_empty() {
        println!("Nothing new today.");
        return Ok(());
    }

    println!("New today ({} episodes)", episodes.len());
    println!("{:-<70}", "");

    for ep in episodes {
        let marker = if ep.alert { "!" } else { " " };
        println!(
            "{marker} [{}] {} S{:02}E{:02} {}",
            ep.title_id, ep.title_name, ep.season, ep.number, ep.name
        );
    }

    Ok(())
}

pub async fn cmd_clear_alert(state: &SharedState, id: i32, number: i32) -> anyhow::Result<()> {
    let cleared = state.alerts.clear_alert(TitleId::new(id), number).await?;

    if cleared == 0 {
        println!("No alert was set on episode {number} of title {id}.");
    } else {
        println!("✓ Cleared {cleared} alert(s) on episode {number} of title {id}");
    }

    Ok(())
}
