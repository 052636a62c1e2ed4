use crate::infra::{ScriptedOutreachGateway, StaticLeadSource};
use crate::render::{render_detail, render_selection, render_table};
use clap::Args;
use lead_desk::error::AppError;
use lead_desk::leads::{
    FailurePolicy, Lead, LeadDashboard, LeadId, LeadRow, LeadStatus, NotificationLog,
    OutreachGateway, TransitionPhase,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Make the simulated outreach webhook reject the request.
    #[arg(long)]
    pub(crate) fail_outreach: bool,
    /// Restore the previous status when outreach fails instead of keeping
    /// the optimistic one.
    #[arg(long)]
    pub(crate) revert_on_failure: bool,
}

type DemoDashboard = LeadDashboard<StaticLeadSource, ScriptedOutreachGateway, NotificationLog>;

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        fail_outreach,
        revert_on_failure,
    } = args;

    let policy = if revert_on_failure {
        FailurePolicy::Revert
    } else {
        FailurePolicy::KeepOptimistic
    };
    let notifications = Arc::new(NotificationLog::default());
    let gateway = Arc::new(ScriptedOutreachGateway::new(fail_outreach));
    let mut dashboard = LeadDashboard::with_policy(
        Arc::new(StaticLeadSource::new(demo_leads())),
        gateway.clone(),
        notifications.clone(),
        policy,
    );

    println!("Lead review demo");
    let loaded = dashboard.load().await?;
    println!("Loaded {loaded} leads (newest first)");
    print_view(&dashboard);

    let bands = dashboard.band_options();
    let labels = dashboard.label_options();
    println!("\nBand options: {}", bands.join(", "));
    println!("Label options: {}", labels.join(", "));

    if let Some(band) = bands.first() {
        dashboard.set_band_filter(band.as_str());
        println!("\nFiltered by band = {band}");
        print_view(&dashboard);
    }
    if let Some(label) = labels.first() {
        dashboard.set_label_filter(label.as_str());
        println!("\nFiltered by band and label = {label}");
        print_view(&dashboard);
    }

    dashboard.clear_filters();
    println!("\nFilters cleared");
    print_view(&dashboard);

    let target = match dashboard.view().first() {
        Some(lead) => lead.id.clone(),
        None => return Ok(()),
    };
    dashboard.activate_row(&target);
    println!("\nDetail view");
    if let Some(lead) = dashboard.selection().active() {
        render_detail(lead);
    }

    println!(
        "\nSending outreach ({} webhook, {:?} on failure)",
        if fail_outreach { "failing" } else { "healthy" },
        policy
    );
    let ticket = dashboard.begin_outreach()?;
    println!(
        "- Optimistic update: {} -> {}",
        ticket.previous_status(),
        LeadStatus::OutreachSent
    );
    render_selection(&dashboard.selection_view());

    if let Err(skipped) = dashboard.begin_outreach() {
        println!("- Second trigger ignored: {skipped}");
    }

    let result = dashboard.gateway().send(ticket.lead_id()).await;
    let resolution = dashboard.complete_outreach(ticket, result);
    println!("- Webhook calls: {}", gateway.sent().len());
    println!("- Resolution: {:?}", resolution.phase);
    render_selection(&dashboard.selection_view());

    if resolution.phase == TransitionPhase::Failed {
        if let Some(lead) = dashboard.lead(&resolution.lead_id) {
            println!("- Status after failure: {}", lead.status);
        }
    }

    println!("\nNotifications");
    for notification in notifications.drain() {
        println!(
            "- [{}] {} ({:?})",
            notification.title, notification.description, notification.severity
        );
    }

    println!("\nFinal table");
    print_view(&dashboard);
    Ok(())
}

fn print_view(dashboard: &DemoDashboard) {
    let rows: Vec<LeadRow> = dashboard
        .view()
        .iter()
        .map(|lead| LeadRow::from(lead.as_ref()))
        .collect();
    render_table(&rows);
}

fn demo_leads() -> Vec<Lead> {
    vec![
        demo_lead(
            "ld-1042",
            "Priya Raman",
            "Northwind Freight",
            "Enterprise",
            "ops-automation",
            LeadStatus::New,
            Some(86.0),
            "2025-03-04T10:00:00Z",
        ),
        demo_lead(
            "ld-1041",
            "Tom Okafor",
            "Brightpath Dental",
            "SMB",
            "support-bot",
            LeadStatus::Contacted,
            Some(64.0),
            "2025-03-03T08:30:00Z",
        ),
        demo_lead(
            "ld-1040",
            "Mei Lin",
            "Keystone Ledger",
            " Enterprise ",
            "ops-automation",
            LeadStatus::Qualified,
            Some(78.0),
            "2025-03-02T16:45:00Z",
        ),
        demo_lead(
            "ld-1039",
            "Jonas Weber",
            "Atelier Weber",
            "SMB",
            "",
            LeadStatus::Other("nurturing".to_string()),
            None,
            "2025-03-01T12:00:00Z",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn demo_lead(
    id: &str,
    name: &str,
    company: &str,
    fit_band: &str,
    label: &str,
    status: LeadStatus,
    score: Option<f64>,
    created_at: &str,
) -> Lead {
    let slug = company.to_ascii_lowercase().replace(' ', "");
    Lead {
        id: LeadId::from(id),
        name: name.to_string(),
        email: format!("hello@{slug}.test"),
        company: Some(company.to_string()),
        website: Some(format!("https://{slug}.test")),
        industry: None,
        company_size: None,
        problem_text: format!("{company} wants to automate repetitive intake work"),
        status,
        score,
        fit_score: score.map(|score| score / 100.0),
        band: Some(fit_band.trim().to_string()),
        fit_band: Some(fit_band.to_string()),
        label: Some(label.to_string()),
        use_case_label: None,
        rationale: None,
        model_rationale: None,
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_desk::leads::{derive_options, FilterDimension};

    #[test]
    fn demo_leads_exercise_trimmed_band_options() {
        let leads: Vec<_> = demo_leads().into_iter().map(Arc::new).collect();
        assert_eq!(
            derive_options(&leads, FilterDimension::FitBand),
            vec!["Enterprise", "SMB"]
        );
        assert_eq!(
            derive_options(&leads, FilterDimension::Label),
            vec!["ops-automation", "support-bot"]
        );
    }

    #[tokio::test]
    async fn demo_runs_with_failing_webhook() {
        run_demo(DemoArgs {
            fail_outreach: true,
            revert_on_failure: true,
        })
        .await
        .expect("demo completes");
    }
}
