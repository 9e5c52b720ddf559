use brandlife::applications::{
    ApplicationFilter, ApplicationListing, ApplicationRepository,
    ApplicationService, ContactRequest, InMemoryApplicationRepository, ListApplicationsParams,
    UpdateApplicationRequest,
};
use brandlife::config::ListingConfig;
use brandlife::error::AppError;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Page size used for the dashboard listing
    #[arg(long, default_value_t = 3)]
    pub(crate) limit: u32,
    /// Number of CSV rows to preview after the header
    #[arg(long, default_value_t = 3)]
    pub(crate) csv_rows: usize,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            limit: 3,
            csv_rows: 3,
        }
    }
}

struct SampleLead {
    full_name: &'static str,
    email: &'static str,
    phone: &'static str,
    instagram: &'static str,
    tiktok: &'static str,
    website: &'static str,
    monthly_revenue: &'static str,
    monthly_budget: &'static str,
    help_needed: &'static [&'static str],
    goals: &'static str,
}

const SAMPLE_LEADS: &[SampleLead] = &[
    SampleLead {
        full_name: "Sarah Johnson",
        email: "sarah.j@beautybrand.com",
        phone: "+1 (555) 234-5678",
        instagram: "@beautybrand",
        tiktok: "@beautybrand",
        website: "https://beautybrand.com",
        monthly_revenue: "50k-200k",
        monthly_budget: "5k-10k",
        help_needed: &["Paid Ads", "Content System"],
        goals: "Decrease CAC by 25%, scale to $300k/mo, launch 2 new product lines",
    },
    SampleLead {
        full_name: "Mike Chen",
        email: "mike@fitgear.io",
        phone: "+1 (555) 876-5432",
        instagram: "@fitgearofficial",
        tiktok: "@fitgear",
        website: "https://fitgear.io",
        monthly_revenue: "10k-50k",
        monthly_budget: "2.5k-5k",
        help_needed: &["UGC / Creators", "CRO / Funnels"],
        goals: "100 qualified leads/mo, improve conversion rate by 15%",
    },
    SampleLead {
        full_name: "Emily Rodriguez",
        email: "emily@localcafe.com",
        phone: "+1 (555) 345-6789",
        instagram: "@thecozycafe",
        tiktok: "@cozycafe",
        website: "https://thecozycafe.com",
        monthly_revenue: "less-than-10k",
        monthly_budget: "1k-2.5k",
        help_needed: &["Content System", "Paid Ads"],
        goals: "Increase foot traffic by 30%, build email list to 5k subscribers",
    },
    SampleLead {
        full_name: "David Park",
        email: "david@techgadgets.co",
        phone: "+1 (555) 789-0123",
        instagram: "@techgadgets",
        tiktok: "@techgadgets_co",
        website: "https://techgadgets.co",
        monthly_revenue: "more-than-200k",
        monthly_budget: "10k-plus",
        help_needed: &["Paid Ads", "UGC / Creators", "CRO / Funnels"],
        goals: "Scale to $500k/mo, decrease CAC by 20%, add 3 new offers",
    },
    SampleLead {
        full_name: "Jessica Martinez",
        email: "jess@organicskincare.com",
        phone: "+1 (555) 456-7890",
        instagram: "@organicskin",
        tiktok: "@organicskincare",
        website: "https://organicskincare.com",
        monthly_revenue: "50k-200k",
        monthly_budget: "5k-10k",
        help_needed: &["Content System", "UGC / Creators"],
        goals: "Launch subscription model, 200 qualified leads/mo, expand to new markets",
    },
];

/// Review decisions applied after seeding: (email, status, notes).
const SAMPLE_REVIEWS: &[(&str, &str, Option<&str>)] = &[
    ("mike@fitgear.io", "reviewed", Some("Discovery call booked")),
    (
        "david@techgadgets.co",
        "approved",
        Some("Strong fit for paid ads retainer"),
    ),
    ("emily@localcafe.com", "rejected", Some("Budget below minimum")),
];

impl SampleLead {
    fn to_request(&self) -> ContactRequest {
        ContactRequest {
            full_name: Some(self.full_name.to_string()),
            email: Some(self.email.to_string()),
            phone: Some(self.phone.to_string()),
            instagram: Some(self.instagram.to_string()),
            tiktok: Some(self.tiktok.to_string()),
            website: Some(self.website.to_string()),
            monthly_revenue: Some(self.monthly_revenue.to_string()),
            monthly_budget: Some(self.monthly_budget.to_string()),
            help_needed: Some(self.help_needed.iter().map(|item| item.to_string()).collect()),
            goals: Some(self.goals.to_string()),
            ..ContactRequest::default()
        }
    }
}

/// Submits every sample lead and applies the sample review decisions.
pub(crate) fn seed_samples<R>(service: &ApplicationService<R>) -> Result<(), AppError>
where
    R: ApplicationRepository + 'static,
{
    let mut submitted = Vec::with_capacity(SAMPLE_LEADS.len());
    for lead in SAMPLE_LEADS {
        submitted.push(service.submit(lead.to_request())?);
    }

    for (email, status, notes) in SAMPLE_REVIEWS {
        let Some(record) = submitted.iter().find(|record| record.email == *email) else {
            continue;
        };
        service.update_status(UpdateApplicationRequest {
            id: Some(record.id.to_string()),
            status: Some(status.to_string()),
            notes: notes.map(str::to_string),
        })?;
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { limit, csv_rows } = args;

    let repository = Arc::new(InMemoryApplicationRepository::default());
    let service = ApplicationService::new(repository, ListingConfig::default());
    seed_samples(&service)?;

    println!("Brand Life Co application dashboard demo");
    let listing = service.list(&ListApplicationsParams {
        page: Some("1".to_string()),
        limit: Some(limit.to_string()),
        ..ListApplicationsParams::default()
    })?;
    render_listing(&listing);

    let mut csv = Vec::new();
    let exported = service.export_csv(&ApplicationFilter::default(), &mut csv)?;
    println!("\nCSV export preview ({exported} rows total)");
    for line in String::from_utf8_lossy(&csv).lines().take(csv_rows + 1) {
        println!("  {line}");
    }

    Ok(())
}

fn render_listing(listing: &ApplicationListing) {
    let stats = &listing.status_stats;
    println!(
        "- {} applications | {} pending | {} reviewed | {} approved | {} rejected",
        stats.total(),
        stats.pending,
        stats.reviewed,
        stats.approved,
        stats.rejected
    );

    let pagination = &listing.pagination;
    println!(
        "\nPage {} of {} (limit {}, has next: {})",
        pagination.page, pagination.total_pages, pagination.limit, pagination.has_next
    );
    for application in &listing.applications {
        println!(
            "  - [{}] {} <{}> | {} | {} | {}",
            application.status.label(),
            application.name,
            application.email,
            application.company,
            application.revenue,
            application.budget
        );
        if let Some(notes) = &application.notes {
            println!("      notes: {notes}");
        }
    }
}
