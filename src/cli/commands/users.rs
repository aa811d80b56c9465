use crate::state::SharedState;

pub async fn cmd_user_add(state: &SharedState, username: &str, admin: bool) -> anyhow::Result<()> {
    let (user, api_key) = state.store.create_user(username, admin).await?;

    println!(
        "✓ Created {} '{}' (ID: {})",
        if user.is_admin { "admin" } else { "user" },
        user.username,
        user.id
    );
    println!("  API key: {api_key}");
    println!("  The key is not shown again.");

    Ok(())
}

pub async fn cmd_user_list(state: &SharedState) -> anyhow::Result<()> {
    let users = state.store.list_users().await?;

    for user in users {
        let role = if user.is_admin { "admin" } else { "user" };
        println!(
            "{:>4}  {:<20} {:<6} since {}",
            user.id, user.username, role, user.created_at
        );
    }

    Ok(())
}
