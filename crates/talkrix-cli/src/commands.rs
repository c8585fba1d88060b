use std::fs;
use std::future::Future;
use std::io;
use std::io::IsTerminal;
use std::io::Write;
use std::path::Path;

use anyhow::bail;
use anyhow::Context;
use talkrix_api::mime_for;
use talkrix_api::ApiResult;
use talkrix_api::CallQuery;
use talkrix_api::DocumentUpload;
use talkrix_core::builtin_tools;
use talkrix_core::builtin_tools::BUILTIN_TOOLS;
use talkrix_core::export::call_export_filename;
use talkrix_core::export::calls_to_csv;
use talkrix_core::listing::Searchable;
use talkrix_core::models::Agent;
use talkrix_core::models::Campaign;
use talkrix_core::models::Contact;
use talkrix_core::models::Corpus;
use talkrix_core::models::CorpusSource;
use talkrix_core::models::StatsPeriod;
use talkrix_core::models::Tool;
use talkrix_core::routing::landing_after_login;
use talkrix_core::routing::Route;
use talkrix_core::validation;
use talkrix_core::validation::ValidationError;
use talkrix_core::CallHistoryView;
use talkrix_core::ListView;
use talkrix_core::Paginator;
use talkrix_core::Paging;
use talkrix_core::Resource;
use talkrix_core::Section;

use crate::context::AppContext;
use crate::output::duration;
use crate::output::or_dash;
use crate::output::page_footer;
use crate::output::truncate;
use crate::output::Table;
use crate::AgentCommand;
use crate::AgentFields;
use crate::CallArgs;
use crate::CallCommand;
use crate::CampaignCommand;
use crate::CampaignFields;
use crate::ContactCommand;
use crate::ContactFields;
use crate::CorpusCommand;
use crate::ListArgs;
use crate::SettingsCommand;
use crate::ToolCommand;
use crate::ToolFields;
use crate::TourCommand;

const MAX_CONCURRENT_CALLS: u64 = 100;
const MAX_CALL_MINUTES: u64 = 120;

/// Runs one request and routes failures through the session check.
async fn call<T>(
    ctx: &mut AppContext,
    request: impl Future<Output = ApiResult<T>>,
) -> anyhow::Result<T> {
    request.await.map_err(|err| ctx.api_failure(err))
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Asks before destructive changes when a person is at the terminal.
fn confirm(question: &str) -> io::Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(true);
    }
    print!("{question} [y/N]: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "YES"))
}

fn value_or_prompt(value: Option<String>, label: &str) -> io::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => prompt(label),
    }
}

fn list_view<T: Searchable>(items: Vec<T>, args: &ListArgs, page_size: usize) -> ListView<T> {
    let mut view = ListView::new(args.per_page.unwrap_or(page_size), Paging::Client);
    view.items = Resource::Ready(items);
    view.set_query(args.search.clone().unwrap_or_default());
    open_page(&mut view.paginator, args.page);
    view
}

/// Moves to the requested page, warning on stderr when it does not exist.
/// Returns false in that case.
fn open_page(paginator: &mut Paginator, page: usize) -> bool {
    if page <= 1 || paginator.go_to(page) {
        return true;
    }
    eprintln!(
        "page {} is out of range; showing page 1 of {}",
        page,
        paginator.total_pages()
    );
    false
}

fn print_table(table: Table, empty: &str, footer: String) {
    if table.is_empty() {
        println!("{empty}");
        return;
    }
    print!("{}", table.render());
    if !footer.is_empty() {
        println!("{footer}");
    }
}

pub async fn login(
    ctx: &mut AppContext,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let email = value_or_prompt(email, "Email")?;
    let password = value_or_prompt(password, "Password")?;
    validation::login(&email, &password)?;

    let auth = ctx
        .anonymous_client()
        .login(email.trim(), &password)
        .await?;
    let session = ctx.sessions.init(&auth, false)?;
    tracing::info!("logged in user {:?}", session.user_id);

    println!(
        "Logged in as {}",
        session.name.as_deref().unwrap_or(email.trim())
    );
    let landing = landing_after_login(&mut ctx.sessions)?;
    println!("Next: {}", command_for(&landing));
    Ok(())
}

pub async fn register(
    ctx: &mut AppContext,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let name = value_or_prompt(name, "Name")?;
    let email = value_or_prompt(email, "Email")?;
    let (password, confirm_password) = match password {
        Some(password) => (password, None),
        None => {
            let password = prompt("Password")?;
            let again = prompt("Confirm password")?;
            (password, Some(again))
        }
    };
    validation::register(&name, &email, &password, confirm_password.as_deref())?;

    let auth = ctx
        .anonymous_client()
        .register(name.trim(), email.trim(), &password)
        .await?;
    ctx.sessions.init(&auth, true)?;
    println!("Welcome to Talkrix, {}!", name.trim());
    println!("Run `talkrix ui` for a guided tour of the dashboard.");
    Ok(())
}

pub fn logout(ctx: &mut AppContext) -> anyhow::Result<()> {
    ctx.sessions.teardown()?;
    println!("Logged out.");
    Ok(())
}

pub fn whoami(ctx: &mut AppContext) -> anyhow::Result<()> {
    let (session, _) = ctx.authorize(Route::dashboard())?;
    println!("Name:  {}", or_dash(session.name.as_deref()));
    println!("Email: {}", or_dash(session.email.as_deref()));
    println!("ID:    {}", or_dash(session.user_id.as_deref()));
    println!("API:   {}", ctx.config.api.base_url);
    Ok(())
}

/// CLI equivalent of a dashboard route, shown after login.
fn command_for(route: &Route) -> String {
    match route {
        Route::Login | Route::Register | Route::Page(Section::Overview) => {
            "talkrix ui".to_string()
        }
        Route::Page(Section::Agents) => "talkrix agents list".to_string(),
        Route::Page(Section::Tools) => "talkrix tools list".to_string(),
        Route::Page(Section::Knowledge) => "talkrix corpora list".to_string(),
        Route::Page(Section::Campaigns) => "talkrix campaigns list".to_string(),
        Route::Page(Section::Calls) => "talkrix calls list".to_string(),
        Route::Page(Section::Settings) => "talkrix settings show".to_string(),
        Route::Campaign(id) => format!("talkrix campaigns show {id}"),
    }
}

pub async fn stats(ctx: &mut AppContext, period: StatsPeriod) -> anyhow::Result<()> {
    let (_, client) = ctx.authorize(Route::dashboard())?;
    let stats = call(ctx, client.dashboard_stats(period)).await?;
    println!("Dashboard ({})", period.as_str());
    println!("  Total calls:      {}", stats.total_calls);
    println!("  Total minutes:    {:.1}", stats.total_minutes);
    println!("  Active agents:    {}", stats.active_agents);
    println!("  Active campaigns: {}", stats.active_campaigns);
    println!("  Success rate:     {:.1}%", stats.success_rate);
    println!("  Total cost:       ${:.2}", stats.total_cost);
    Ok(())
}

pub async fn agents(ctx: &mut AppContext, command: AgentCommand) -> anyhow::Result<()> {
    let (_, client) = ctx.authorize(Route::Page(Section::Agents))?;
    match command {
        AgentCommand::List(args) => {
            let agents = call(ctx, client.list_agents()).await?;
            let view = list_view(agents, &args, ctx.config.page_size());
            let mut table = Table::new(vec!["ID", "Name", "Voice", "Model", "Tools"]);
            for agent in view.visible() {
                table.row(vec![
                    agent.id.clone(),
                    agent.name.clone(),
                    or_dash(agent.voice.as_deref()),
                    or_dash(agent.model.as_deref()),
                    agent.selected_tools.len().to_string(),
                ]);
            }
            print_table(table, "No agents found.", page_footer(&view.paginator));
        }
        AgentCommand::Show { id } => {
            let agent = call(ctx, client.get_agent(&id)).await?;
            print_agent(&agent);
        }
        AgentCommand::Create(fields) => {
            let mut agent = Agent::default();
            apply_agent_fields(&mut agent, fields)?;
            validation::required("Name", &agent.name)?;
            validation::required("System prompt", &agent.system_prompt)?;
            let created = call(ctx, client.create_agent(&agent)).await?;
            println!("Created agent {} ({})", created.name, created.id);
        }
        AgentCommand::Update { id, fields } => {
            let mut agent = call(ctx, client.get_agent(&id)).await?;
            apply_agent_fields(&mut agent, fields)?;
            validation::required("Name", &agent.name)?;
            let updated = call(ctx, client.update_agent(&id, &agent)).await?;
            println!("Updated agent {}", updated.name);
        }
        AgentCommand::Delete { id } => {
            if !confirm(&format!("Delete agent {id}?"))? {
                return Ok(());
            }
            call(ctx, client.delete_agent(&id)).await?;
            println!("Deleted agent {id}");
        }
    }
    Ok(())
}

fn apply_agent_fields(agent: &mut Agent, fields: AgentFields) -> anyhow::Result<()> {
    if let Some(temperature) = fields.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            bail!("temperature must be between 0 and 2");
        }
        agent.temperature = Some(temperature);
    }
    if let Some(name) = fields.name {
        agent.name = name.trim().to_string();
    }
    if let Some(prompt) = fields.prompt {
        agent.system_prompt = prompt;
    }
    agent.voice = fields.voice.or(agent.voice.take());
    agent.model = fields.model.or(agent.model.take());
    agent.language = fields.language.or(agent.language.take());
    if !fields.tools.is_empty() {
        agent.selected_tools = fields.tools;
    }
    Ok(())
}

fn print_agent(agent: &Agent) {
    println!("{} ({})", agent.name, agent.id);
    println!("  Voice:       {}", or_dash(agent.voice.as_deref()));
    println!("  Model:       {}", or_dash(agent.model.as_deref()));
    println!("  Language:    {}", or_dash(agent.language.as_deref()));
    if let Some(temperature) = agent.temperature {
        println!("  Temperature: {temperature:.2}");
    }
    if !agent.selected_tools.is_empty() {
        println!("  Tools:       {}", agent.selected_tools.join(", "));
    }
    println!("  Prompt:");
    for line in agent.system_prompt.lines() {
        println!("    {line}");
    }
}

pub async fn tools(ctx: &mut AppContext, command: ToolCommand) -> anyhow::Result<()> {
    let (_, client) = ctx.authorize(Route::Page(Section::Tools))?;
    match command {
        ToolCommand::List(args) => {
            let user_tools = call(ctx, client.list_tools()).await?;
            let tools: Vec<Tool> = BUILTIN_TOOLS
                .iter()
                .map(|tool| tool.as_tool())
                .chain(user_tools)
                .collect();
            let view = list_view(tools, &args, ctx.config.page_size());
            let mut table = Table::new(vec!["ID", "Name", "Kind", "Description"]);
            for tool in view.visible() {
                let kind = if builtin_tools::is_builtin(&tool.id) {
                    "built-in"
                } else {
                    "custom"
                };
                table.row(vec![
                    tool.id.clone(),
                    tool.name.clone(),
                    kind.to_string(),
                    truncate(&tool.description, 60),
                ]);
            }
            print_table(table, "No tools found.", page_footer(&view.paginator));
        }
        ToolCommand::Show { id } => {
            let tool = match builtin_tools::find(&id) {
                Some(builtin) => builtin.as_tool(),
                None => call(ctx, client.get_tool(&id)).await?,
            };
            println!("{} ({})", tool.name, tool.id);
            println!("  {}", tool.description);
            if let Some(url) = &tool.base_url {
                println!(
                    "  Endpoint: {} {}",
                    tool.http_method.as_deref().unwrap_or("GET"),
                    url
                );
            }
            for param in &tool.parameters {
                println!(
                    "  - {} ({}, {}){}",
                    param.name,
                    param.location,
                    param.schema_type,
                    if param.required { " required" } else { "" }
                );
            }
        }
        ToolCommand::Create(fields) => {
            let mut tool = Tool::default();
            apply_tool_fields(&mut tool, fields)?;
            validation::required("Name", &tool.name)?;
            validation::required("Description", &tool.description)?;
            if builtin_tools::is_builtin(&tool.name) {
                bail!("{} is a built-in tool name", tool.name);
            }
            let created = call(ctx, client.create_tool(&tool)).await?;
            println!("Created tool {} ({})", created.name, created.id);
        }
        ToolCommand::Update { id, fields } => {
            reject_builtin(&id)?;
            let mut tool = call(ctx, client.get_tool(&id)).await?;
            apply_tool_fields(&mut tool, fields)?;
            let updated = call(ctx, client.update_tool(&id, &tool)).await?;
            println!("Updated tool {}", updated.name);
        }
        ToolCommand::Delete { id } => {
            reject_builtin(&id)?;
            if !confirm(&format!("Delete tool {id}?"))? {
                return Ok(());
            }
            call(ctx, client.delete_tool(&id)).await?;
            println!("Deleted tool {id}");
        }
    }
    Ok(())
}

fn reject_builtin(id: &str) -> anyhow::Result<()> {
    if builtin_tools::is_builtin(id) {
        bail!("{id} is a built-in tool and cannot be changed");
    }
    Ok(())
}

fn apply_tool_fields(tool: &mut Tool, fields: ToolFields) -> Result<(), ValidationError> {
    if let Some(url) = fields.url {
        validation::url(&url)?;
        tool.base_url = Some(url.trim().to_string());
    }
    if let Some(name) = fields.name {
        tool.name = name.trim().to_string();
    }
    if let Some(description) = fields.description {
        tool.description = description;
    }
    if let Some(method) = fields.method {
        tool.http_method = Some(method.to_ascii_uppercase());
    }
    Ok(())
}

pub async fn campaigns(ctx: &mut AppContext, command: CampaignCommand) -> anyhow::Result<()> {
    let route = match &command {
        CampaignCommand::Show { id } => Route::Campaign(id.clone()),
        _ => Route::Page(Section::Campaigns),
    };
    let (_, client) = ctx.authorize(route)?;
    match command {
        CampaignCommand::List(args) => {
            let campaigns = call(ctx, client.list_campaigns()).await?;
            let view = list_view(campaigns, &args, ctx.config.page_size());
            let mut table = Table::new(vec!["ID", "Name", "Status", "Contacts", "Scheduled"]);
            for campaign in view.visible() {
                table.row(vec![
                    campaign.id.clone(),
                    campaign.name.clone(),
                    campaign.status.clone(),
                    campaign.contact_count.to_string(),
                    or_dash(campaign.scheduled_at.as_deref()),
                ]);
            }
            print_table(table, "No campaigns found.", page_footer(&view.paginator));
        }
        CampaignCommand::Show { id } => {
            let (campaign, stats) = call(ctx, client.campaign_detail(&id)).await?;
            println!("{} ({})", campaign.name, campaign.id);
            if let Some(description) = &campaign.description {
                println!("  {description}");
            }
            println!("  Status:       {}", campaign.status);
            println!("  Agent:        {}", or_dash(campaign.agent_id.as_deref()));
            println!("  From number:  {}", or_dash(campaign.from_number.as_deref()));
            println!("  Scheduled at: {}", or_dash(campaign.scheduled_at.as_deref()));
            println!(
                "  Contacts:     {} total, {} called, {} completed, {} failed, {} pending",
                stats.total_contacts, stats.called, stats.completed, stats.failed, stats.pending
            );
            println!("  Success rate: {:.1}%", stats.success_rate);
        }
        CampaignCommand::Create(fields) => {
            let mut campaign = Campaign::default();
            apply_campaign_fields(&mut campaign, fields)?;
            validation::required("Name", &campaign.name)?;
            let created = call(ctx, client.create_campaign(&campaign)).await?;
            println!("Created campaign {} ({})", created.name, created.id);
        }
        CampaignCommand::Update { id, fields } => {
            let mut campaign = call(ctx, client.get_campaign(&id)).await?;
            apply_campaign_fields(&mut campaign, fields)?;
            validation::required("Name", &campaign.name)?;
            let updated = call(ctx, client.update_campaign(&id, &campaign)).await?;
            println!("Updated campaign {}", updated.name);
        }
        CampaignCommand::Delete { id } => {
            if !confirm(&format!("Delete campaign {id}?"))? {
                return Ok(());
            }
            call(ctx, client.delete_campaign(&id)).await?;
            println!("Deleted campaign {id}");
        }
    }
    Ok(())
}

fn apply_campaign_fields(campaign: &mut Campaign, fields: CampaignFields) -> Result<(), ValidationError> {
    if let Some(number) = &fields.from_number {
        validation::phone(number)?;
    }
    if let Some(name) = fields.name {
        campaign.name = name.trim().to_string();
    }
    campaign.description = fields.description.or(campaign.description.take());
    campaign.agent_id = fields.agent.or(campaign.agent_id.take());
    campaign.from_number = fields.from_number.or(campaign.from_number.take());
    campaign.scheduled_at = fields.scheduled_at.or(campaign.scheduled_at.take());
    Ok(())
}

pub async fn contacts(ctx: &mut AppContext, command: ContactCommand) -> anyhow::Result<()> {
    let campaign_id = match &command {
        ContactCommand::List { campaign, .. }
        | ContactCommand::Add { campaign, .. }
        | ContactCommand::Update { campaign, .. }
        | ContactCommand::Delete { campaign, .. }
        | ContactCommand::Upload { campaign, .. } => campaign.clone(),
    };
    let (_, client) = ctx.authorize(Route::Campaign(campaign_id))?;
    match command {
        ContactCommand::List { campaign, list } => {
            let contacts = call(ctx, client.list_contacts(&campaign)).await?;
            let view = list_view(contacts, &list, ctx.config.page_size());
            let mut table = Table::new(vec!["ID", "Name", "Phone", "Email", "Status"]);
            for contact in view.visible() {
                table.row(vec![
                    contact.id.clone(),
                    contact.name.clone(),
                    contact.phone_number.clone(),
                    or_dash(contact.email.as_deref()),
                    or_dash(contact.status.as_deref()),
                ]);
            }
            print_table(table, "No contacts found.", page_footer(&view.paginator));
        }
        ContactCommand::Add { campaign, fields } => {
            let mut contact = Contact::default();
            apply_contact_fields(&mut contact, fields)?;
            validation::required("Name", &contact.name)?;
            validation::phone(&contact.phone_number)?;
            let created = call(ctx, client.add_contact(&campaign, &contact)).await?;
            println!("Added contact {} ({})", created.name, created.id);
        }
        ContactCommand::Update {
            campaign,
            contact,
            fields,
        } => {
            let existing = call(ctx, client.list_contacts(&campaign)).await?;
            let Some(mut record) = existing.into_iter().find(|c| c.id == contact) else {
                bail!("contact {contact} not found in campaign {campaign}");
            };
            apply_contact_fields(&mut record, fields)?;
            let updated = call(ctx, client.update_contact(&campaign, &contact, &record)).await?;
            println!("Updated contact {}", updated.name);
        }
        ContactCommand::Delete { campaign, contact } => {
            if !confirm(&format!("Delete contact {contact}?"))? {
                return Ok(());
            }
            call(ctx, client.delete_contact(&campaign, &contact)).await?;
            println!("Deleted contact {contact}");
        }
        ContactCommand::Upload { campaign, file } => {
            let (file_name, contents) = read_upload(&file)?;
            let result = call(ctx, client.upload_contacts(&campaign, &file_name, contents)).await?;
            println!(
                "Imported {} contacts, skipped {}",
                result.imported, result.skipped
            );
            for error in &result.errors {
                eprintln!("  {error}");
            }
        }
    }
    Ok(())
}

fn apply_contact_fields(contact: &mut Contact, fields: ContactFields) -> Result<(), ValidationError> {
    if let Some(phone) = fields.phone {
        validation::phone(&phone)?;
        contact.phone_number = phone.trim().to_string();
    }
    if let Some(email) = fields.email {
        validation::email(&email)?;
        contact.email = Some(email.trim().to_string());
    }
    if let Some(name) = fields.name {
        contact.name = name.trim().to_string();
    }
    Ok(())
}

fn read_upload(path: &Path) -> anyhow::Result<(String, Vec<u8>)> {
    let contents = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .context("upload path has no file name")?;
    Ok((file_name, contents))
}

/// Loads one server page of call history with the client-side search
/// applied on top.
async fn load_calls(
    ctx: &mut AppContext,
    args: &CallArgs,
) -> anyhow::Result<CallHistoryView> {
    let (_, client) = ctx.authorize(Route::Page(Section::Calls))?;
    let per_page = args.list.per_page.unwrap_or(ctx.config.page_size());
    let mut query = CallQuery::page(args.list.page, per_page);
    query.status = args.status.map(Into::into);
    query.call_type = args.call_type.map(Into::into);

    let page = call(ctx, client.list_calls(&query)).await?;
    let mut view = CallHistoryView {
        list: ListView::new(per_page, Paging::Server),
        status: query.status,
        call_type: query.call_type,
        stats: Resource::Idle,
    };
    view.apply_page(page);
    open_page(&mut view.list.paginator, query.page);
    view.list.set_query(args.list.search.clone().unwrap_or_default());
    Ok(view)
}

pub async fn calls(ctx: &mut AppContext, command: CallCommand) -> anyhow::Result<()> {
    match command {
        CallCommand::List(args) => {
            let view = load_calls(ctx, &args).await?;
            let mut table = Table::new(vec![
                "ID", "Agent", "From", "To", "Status", "Type", "Duration", "Started",
            ]);
            for record in view.list.visible() {
                table.row(vec![
                    record.id.clone(),
                    record.agent_name.clone(),
                    record.from_number.clone(),
                    record.to_number.clone(),
                    record.status.label().to_string(),
                    record.call_type.label().to_string(),
                    duration(record.duration_seconds),
                    or_dash(record.started_at.as_deref()),
                ]);
            }
            print_table(table, "No calls found.", page_footer(&view.list.paginator));
        }
        CallCommand::Export { args, output } => {
            let view = load_calls(ctx, &args).await?;
            let rows: Vec<_> = view.list.visible().into_iter().cloned().collect();
            if rows.is_empty() {
                println!("No calls to export");
                return Ok(());
            }
            let path = output.unwrap_or_else(|| {
                call_export_filename(chrono::Local::now().date_naive()).into()
            });
            fs::write(&path, calls_to_csv(&rows))
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported {} calls to {}", rows.len(), path.display());
        }
        CallCommand::Stats => {
            let (_, client) = ctx.authorize(Route::Page(Section::Calls))?;
            let stats = call(ctx, client.call_stats()).await?;
            println!("Total calls:      {}", stats.total_calls);
            println!("Completed:        {}", stats.completed_calls);
            println!("Failed:           {}", stats.failed_calls);
            println!(
                "Average duration: {}",
                duration(stats.average_duration_seconds.round() as u64)
            );
            println!("Total cost:       ${:.2}", stats.total_cost);
        }
    }
    Ok(())
}

pub async fn corpora(ctx: &mut AppContext, command: CorpusCommand) -> anyhow::Result<()> {
    let (_, client) = ctx.authorize(Route::Page(Section::Knowledge))?;
    match command {
        CorpusCommand::List(args) => {
            let corpora = call(ctx, client.list_corpora()).await?;
            let view = list_view(corpora, &args, ctx.config.page_size());
            let mut table = Table::new(vec!["ID", "Name", "Documents", "Description"]);
            for corpus in view.visible() {
                table.row(vec![
                    corpus.id.clone(),
                    corpus.name.clone(),
                    corpus.document_count.to_string(),
                    truncate(&or_dash(corpus.description.as_deref()), 50),
                ]);
            }
            print_table(table, "No knowledge bases found.", page_footer(&view.paginator));
        }
        CorpusCommand::Show { id } => {
            let corpus = call(ctx, client.get_corpus(&id)).await?;
            println!("{} ({})", corpus.name, corpus.id);
            if let Some(description) = &corpus.description {
                println!("  {description}");
            }
            println!("  Documents: {}", corpus.document_count);
        }
        CorpusCommand::Create { name, description } => {
            validation::required("Name", &name)?;
            let corpus = Corpus {
                name: name.trim().to_string(),
                description,
                ..Corpus::default()
            };
            let created = call(ctx, client.create_corpus(&corpus)).await?;
            println!("Created knowledge base {} ({})", created.name, created.id);
        }
        CorpusCommand::Delete { id } => {
            if !confirm(&format!("Delete knowledge base {id} and its documents?"))? {
                return Ok(());
            }
            call(ctx, client.delete_corpus(&id)).await?;
            println!("Deleted knowledge base {id}");
        }
        CorpusCommand::Sources { id } => {
            let sources = call(ctx, client.list_sources(&id)).await?;
            let mut table = Table::new(vec!["ID", "Name", "Kind", "Documents", "Start URLs"]);
            for source in &sources {
                table.row(vec![
                    source.id.clone(),
                    source.name.clone(),
                    or_dash(source.kind.as_deref()),
                    source.document_count.to_string(),
                    source.start_urls.join(" "),
                ]);
            }
            print_table(table, "No sources.", String::new());
        }
        CorpusCommand::AddSource {
            id,
            name,
            urls,
            max_documents,
        } => {
            validation::required("Name", &name)?;
            for url in &urls {
                validation::url(url)?;
            }
            let source = CorpusSource {
                name: name.trim().to_string(),
                kind: Some("crawl".to_string()),
                start_urls: urls,
                max_documents,
                ..CorpusSource::default()
            };
            let created = call(ctx, client.create_source(&id, &source)).await?;
            println!("Added source {} ({})", created.name, created.id);
        }
        CorpusCommand::DeleteSource { id, source } => {
            call(ctx, client.delete_source(&id, &source)).await?;
            println!("Deleted source {source}");
        }
        CorpusCommand::Documents { id } => {
            let documents = call(ctx, client.list_documents(&id)).await?;
            let mut table = Table::new(vec!["ID", "File", "Type", "Size", "Created"]);
            for document in &documents {
                table.row(vec![
                    document.id.clone(),
                    document.file_name.clone(),
                    or_dash(document.mime_type.as_deref()),
                    document
                        .size_bytes
                        .map(|b| format!("{:.1} KB", b as f64 / 1024.0))
                        .unwrap_or_else(|| "-".to_string()),
                    or_dash(document.created_at.as_deref()),
                ]);
            }
            print_table(table, "No documents.", String::new());
        }
        CorpusCommand::DeleteDocument { id, document } => {
            call(ctx, client.delete_document(&id, &document)).await?;
            println!("Deleted document {document}");
        }
        CorpusCommand::Upload { id, file, source } => {
            let (file_name, contents) = read_upload(&file)?;
            let upload = DocumentUpload {
                mime_type: mime_for(&file_name).to_string(),
                file_name,
                source_id: source,
                contents,
            };
            match client.upload_document(&id, upload).await {
                Ok(document) => println!("Uploaded {} ({})", document.file_name, document.id),
                Err(err) => {
                    let stage = err.stage.label();
                    let source = ctx.api_failure(err.source);
                    return Err(source.context(format!("{stage} failed")));
                }
            }
        }
        CorpusCommand::Query {
            id,
            query,
            max_results,
        } => {
            validation::required("Query", &query)?;
            let chunks = call(ctx, client.query_corpus(&id, &query, max_results)).await?;
            if chunks.is_empty() {
                println!("No matching passages.");
            }
            for (idx, chunk) in chunks.iter().enumerate() {
                println!("{}. [{:.2}] {}", idx + 1, chunk.score, chunk.content.trim());
            }
        }
    }
    Ok(())
}

pub async fn settings(ctx: &mut AppContext, command: SettingsCommand) -> anyhow::Result<()> {
    let (_, client) = ctx.authorize(Route::Page(Section::Settings))?;
    match command {
        SettingsCommand::Show => {
            let (general, telephony) = call(ctx, client.all_settings()).await?;
            println!("General");
            println!("  Company:              {}", or_dash(general.company_name.as_deref()));
            println!("  Timezone:             {}", or_dash(general.timezone.as_deref()));
            println!(
                "  Default agent:        {}",
                or_dash(general.default_agent_id.as_deref())
            );
            println!(
                "  Max concurrent calls: {}",
                general
                    .max_concurrent_calls
                    .map_or_else(|| "-".to_string(), |v| v.to_string())
            );
            println!(
                "  Max call duration:    {}",
                general
                    .max_call_duration_minutes
                    .map_or_else(|| "-".to_string(), |v| format!("{v} min"))
            );
            println!("Telephony");
            println!("  Provider:      {}", or_dash(telephony.provider.as_deref()));
            println!("  Account SID:   {}", or_dash(telephony.account_sid.as_deref()));
            println!(
                "  Auth token:    {}",
                if telephony.auth_token.is_some() { "set" } else { "-" }
            );
            println!("  Phone numbers: {}", telephony.phone_numbers.join(", "));
        }
        SettingsCommand::Update {
            company,
            timezone,
            default_agent,
            max_concurrent_calls,
            max_call_duration,
        } => {
            if let Some(calls) = max_concurrent_calls {
                validation::in_range(
                    "Max concurrent calls",
                    u64::from(calls),
                    1,
                    MAX_CONCURRENT_CALLS,
                )?;
            }
            if let Some(minutes) = max_call_duration {
                validation::in_range(
                    "Max call duration",
                    u64::from(minutes),
                    1,
                    MAX_CALL_MINUTES,
                )?;
            }
            let mut general = call(ctx, client.general_settings()).await?;
            general.company_name = company.or(general.company_name);
            general.timezone = timezone.or(general.timezone);
            general.default_agent_id = default_agent.or(general.default_agent_id);
            general.max_concurrent_calls = max_concurrent_calls.or(general.max_concurrent_calls);
            general.max_call_duration_minutes =
                max_call_duration.or(general.max_call_duration_minutes);
            call(ctx, client.update_general_settings(&general)).await?;
            println!("Settings saved.");
        }
        SettingsCommand::Telephony {
            provider,
            account_sid,
            auth_token,
            phones,
        } => {
            for phone in &phones {
                validation::phone(phone)?;
            }
            let mut telephony = call(ctx, client.telephony_settings()).await?;
            telephony.provider = provider.or(telephony.provider);
            telephony.account_sid = account_sid.or(telephony.account_sid);
            telephony.auth_token = auth_token.or(telephony.auth_token);
            if !phones.is_empty() {
                telephony.phone_numbers = phones;
            }
            call(ctx, client.update_telephony_settings(&telephony)).await?;
            println!("Telephony settings saved.");
        }
    }
    Ok(())
}

pub async fn api_key(ctx: &mut AppContext, regenerate: bool, copy: bool) -> anyhow::Result<()> {
    let (_, client) = ctx.authorize(Route::Page(Section::Settings))?;
    let key = if regenerate {
        if !confirm("Regenerate the API key? The current key stops working immediately.")? {
            return Ok(());
        }
        call(ctx, client.regenerate_api_key()).await?
    } else {
        call(ctx, client.api_key()).await?
    };

    if copy {
        let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
        clipboard
            .set_text(key.key.clone())
            .context("failed to copy API key")?;
        println!("API key {} copied to clipboard", mask(&key.key));
    } else {
        println!("{}", key.key);
    }
    Ok(())
}

fn mask(key: &str) -> String {
    let visible: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("••••{visible}")
}

pub async fn tour(ctx: &mut AppContext, command: TourCommand) -> anyhow::Result<()> {
    match command {
        TourCommand::Status => {
            if ctx.sessions.tour_completed() {
                println!("Tour completed. Run `talkrix tour reset` to see it again.");
            } else {
                println!("Tour not completed yet. It opens in `talkrix ui`.");
            }
        }
        TourCommand::Reset => {
            ctx.sessions.set_tour_completed(false)?;
            println!("Tour reset. It will start from the first step in `talkrix ui`.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use talkrix_core::models::CallPage;

    use super::*;

    fn args(search: Option<&str>, page: usize) -> ListArgs {
        ListArgs {
            search: search.map(str::to_string),
            page,
            per_page: Some(2),
        }
    }

    fn agents(names: &[&str]) -> Vec<Agent> {
        names
            .iter()
            .map(|name| Agent {
                id: name.to_lowercase(),
                name: name.to_string(),
                ..Agent::default()
            })
            .collect()
    }

    #[test]
    fn list_view_applies_search_then_page() {
        let view = list_view(
            agents(&["Sales", "Billing", "Support", "Survey"]),
            &args(Some("s"), 2),
            20,
        );
        let names: Vec<&str> = view.visible().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Survey"]);
        assert_eq!(view.paginator.total_pages(), 2);
    }

    #[test]
    fn out_of_range_page_falls_back_to_first() {
        let view = list_view(agents(&["A", "B", "C"]), &args(None, 9), 20);
        assert_eq!(view.paginator.current_page(), 1);
    }

    #[test]
    fn server_page_past_the_total_stays_on_first() {
        let mut view = CallHistoryView {
            list: ListView::new(20, Paging::Server),
            status: None,
            call_type: None,
            stats: Resource::Idle,
        };
        view.apply_page(CallPage {
            calls: Vec::new(),
            total: 5,
            page: 3,
            limit: 20,
        });
        assert!(!open_page(&mut view.list.paginator, 3));
        assert_eq!(view.list.paginator.current_page(), 1);
        assert!(open_page(&mut view.list.paginator, 1));
    }

    #[test]
    fn landing_routes_map_to_commands() {
        assert_eq!(command_for(&Route::dashboard()), "talkrix ui");
        assert_eq!(
            command_for(&Route::Campaign("c1".to_string())),
            "talkrix campaigns show c1"
        );
    }

    #[test]
    fn contact_fields_validate_phone() {
        let mut contact = Contact::default();
        let fields = ContactFields {
            phone: Some("12".to_string()),
            ..ContactFields::default()
        };
        assert_eq!(
            apply_contact_fields(&mut contact, fields),
            Err(ValidationError::InvalidPhone)
        );
    }

    #[test]
    fn api_key_is_masked() {
        assert_eq!(mask("tk_live_abcd1234"), "••••1234");
    }
}
