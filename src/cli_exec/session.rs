use checklist::auth::AuthSession;

use super::*;
use crate::RegisterArgs;

pub(super) async fn handle_register_command(ctx: &CliContext, args: RegisterArgs) -> Result<()> {
    let mut session = AuthSession::new(ctx.client()?);
    let user = session
        .register(&args.name, &args.email, &args.password, &args.smartsheet_token)
        .await
        .map_err(client_failure)?;
    println!("Registered and logged in as {} <{}>", user.name, user.email);
    Ok(())
}

pub(super) async fn handle_login_command(
    ctx: &CliContext,
    email: &str,
    password: &str,
) -> Result<()> {
    let mut session = AuthSession::new(ctx.client()?);
    let user = session
        .login(email, password)
        .await
        .map_err(client_failure)?;
    println!("Logged in as {} <{}>", user.name, user.email);
    Ok(())
}

pub(super) async fn handle_logout_command(ctx: &CliContext) -> Result<()> {
    let mut session = AuthSession::new(ctx.client()?);
    session.logout().await.map_err(client_failure)?;
    println!("Logged out");
    Ok(())
}

pub(super) async fn handle_whoami_command(ctx: &CliContext, json: bool) -> Result<()> {
    let mut session = AuthSession::new(ctx.client()?);
    let Some(user) = session.restore().await.map_err(client_failure)? else {
        bail!("not logged in (run `checklist login`)");
    };
    if json {
        return print_json(user, "profile");
    }
    println!("name: {}", user.name);
    println!("email: {}", user.email);
    if let Some(linked) = user.has_smartsheet_token {
        println!("smartsheet token: {}", if linked { "set" } else { "missing" });
    }
    Ok(())
}

pub(super) fn handle_config_command(ctx: &CliContext, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show { json } => {
            let cfg = ctx.effective_config();
            if json {
                return print_json(&cfg, "config");
            }
            println!("home: {}", ctx.state.root().display());
            println!("api_base: {}", cfg.api_base);
            match cfg.timeout_secs {
                Some(secs) => println!("timeout: {}s", secs),
                None => println!("timeout: none"),
            }
        }
        ConfigCommands::SetUrl { url } => {
            let mut cfg = ctx.state.read_config()?;
            cfg.api_base = url.trim_end_matches('/').to_string();
            ctx.state.write_config(&cfg)?;
            println!("api_base: {}", cfg.api_base);
        }
    }
    Ok(())
}
