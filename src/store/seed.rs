//! Demo content loaded on a fresh start

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::AdminStore;
use crate::domain::*;
use crate::services::media;

pub fn populate(store: &AdminStore) {
    let now = Utc::now();
    let today = now.date_naive();

    store.notices.replace_all(notices(now, today));
    store.inquiries.replace_all(inquiries(now));
    store.tenders.replace_all(tenders(now, today));
    store.tender_applications.replace_all(tender_applications(now));
    store.download_requests.replace_all(download_requests(now));
    store.gallery.replace_all(gallery(now, today));
    store.resources.replace_all(resources(now));
    store.jobs.replace_all(jobs(today));
    store.pages.replace_all(pages(now));
    store.deadlines.replace_all(deadlines(today));

    tracing::debug!(records = store.counts().iter().map(|(_, n)| n).sum::<usize>(), "Seeded demo data");
}

fn ago(now: DateTime<Utc>, days: i64, hours: i64) -> DateTime<Utc> {
    now - Duration::days(days) - Duration::hours(hours)
}

fn day(today: NaiveDate, offset: i64) -> NaiveDate {
    today + Duration::days(offset)
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn notices(now: DateTime<Utc>, today: NaiveDate) -> Vec<Notice> {
    let rows: &[(&str, &str, &str, i64, PublishStatus, u64)] = &[
        ("Annual Report 2025 released", "The annual report covering production, safety and financial results is now available.", "Press Release", 3, PublishStatus::Published, 412),
        ("Smelter maintenance shutdown", "Planned maintenance of the flash smelter will run for ten days. Cathode deliveries continue from stock.", "Operations", 9, PublishStatus::Published, 87),
        ("New cathode quality certification", "Our cathodes have been re-registered as LME Grade A following the latest audit.", "Quality", 15, PublishStatus::Published, 203),
        ("Community water project update", "Phase two of the valley water pipeline is complete.", "Community", 22, PublishStatus::Draft, 0),
        ("Q3 production statement", "Copper output rose 4% on the previous quarter.", "Press Release", 40, PublishStatus::Published, 356),
        ("Supplier code of conduct revised", "Updated requirements for contractors working on site.", "Procurement", 55, PublishStatus::Draft, 0),
    ];

    rows.iter()
        .map(|(title, description, category, age, status, downloads)| Notice {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            date: day(today, -age),
            status: *status,
            downloads: *downloads,
            created_at: ago(now, *age, 2),
            updated_at: ago(now, *age, 0),
        })
        .collect()
}

fn inquiries(now: DateTime<Utc>) -> Vec<Inquiry> {
    let rows: &[(&str, &str, Option<&str>, &str, &str, InquiryStatus, i64)] = &[
        ("Maria Lopez", "maria.lopez@andeswire.com", Some("Andes Wire"), "Cathode supply for 2027", "We would like a quote for 2,000 t of Grade A cathode.", InquiryStatus::New, 0),
        ("James Park", "jpark@pacificmetals.kr", Some("Pacific Metals"), "Rod diameter options", "Do you supply 12.5 mm rod in addition to 8 mm?", InquiryStatus::New, 1),
        ("Aisha Bello", "aisha@greenlogistics.ng", None, "Site visit request", "Our sustainability team would like to visit the concentrator.", InquiryStatus::Read, 3),
        ("Tom Fischer", "t.fischer@kabelwerk.de", Some("Kabelwerk GmbH"), "Certificate of analysis", "Please send the latest CoA for lot 2291.", InquiryStatus::Replied, 6),
        ("Priya Nair", "priya.nair@student.edu", None, "Internship programme", "Are internships open for metallurgy students?", InquiryStatus::Archived, 30),
    ];

    rows.iter()
        .map(|(name, email, company, subject, message, status, age)| {
            let received_at = ago(now, *age, 4);
            let replied = *status == InquiryStatus::Replied;
            Inquiry {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: email.to_string(),
                phone: None,
                company: company.map(str::to_string),
                subject: subject.to_string(),
                message: message.to_string(),
                status: *status,
                received_at,
                replied_at: replied.then(|| received_at + Duration::hours(20)),
                reply: replied.then(|| "Please find the certificate attached.".to_string()),
            }
        })
        .collect()
}

fn tenders(now: DateTime<Utc>, today: NaiveDate) -> Vec<TenderPosting> {
    let rows: &[(&str, &str, &str, i64, i64, Option<i64>, TenderStatus, u64)] = &[
        ("TND-2026-014", "Conveyor belt replacement", "Mechanical", -10, 20, Some(1_250_000), TenderStatus::Published, 4),
        ("TND-2026-015", "Tailings dam monitoring sensors", "Instrumentation", -5, 4, Some(380_000), TenderStatus::Published, 2),
        ("TND-2026-016", "Canteen services contract", "Services", 0, 35, None, TenderStatus::Draft, 0),
        ("TND-2026-009", "Haul road resurfacing", "Civil", -60, -15, Some(2_100_000), TenderStatus::Closed, 7),
    ];

    rows.iter()
        .map(|(reference, title, category, publish, closing, budget, status, applications)| TenderPosting {
            id: Uuid::new_v4(),
            reference_no: reference.to_string(),
            title: title.to_string(),
            category: category.to_string(),
            description: format!("{} for the Rio Cobre operation.", title),
            requirements: lines(&["Valid safety certification", "Three comparable projects", "Local presence preferred"]),
            budget: budget.map(Decimal::from),
            publish_date: day(today, *publish),
            closing_date: day(today, *closing),
            status: *status,
            applications: *applications,
            created_at: ago(now, (-publish).max(0) + 2, 0),
            updated_at: ago(now, (-publish).max(0), 0),
        })
        .collect()
}

fn tender_applications(now: DateTime<Utc>) -> Vec<TenderApplication> {
    let rows: &[(&str, &str, &str, &str, &str, ReviewStatus, i64)] = &[
        ("Belting Solutions Ltd", "Carlos Mendes", "bids@beltingsolutions.com", "TND-2026-014", "Mechanical", ReviewStatus::New, 1),
        ("Andean Conveyors", "Lucia Rojas", "lrojas@andeanconveyors.cl", "TND-2026-014", "Mechanical", ReviewStatus::Reviewed, 4),
        ("SensorGrid", "Ben Okafor", "tenders@sensorgrid.io", "TND-2026-015", "Instrumentation", ReviewStatus::New, 2),
        ("Pave Right", "Sam Whitfield", "sam@paveright.com", "TND-2026-009", "Civil", ReviewStatus::Approved, 40),
        ("RoadCo", "Ines Duarte", "ines@roadco.pt", "TND-2026-009", "Civil", ReviewStatus::Rejected, 41),
    ];

    rows.iter()
        .map(|(company, contact, email, reference, category, status, age)| TenderApplication {
            id: Uuid::new_v4(),
            company_name: company.to_string(),
            contact_name: contact.to_string(),
            email: email.to_string(),
            phone: None,
            tender_reference: reference.to_string(),
            category: category.to_string(),
            proposal: format!("{} proposal for {}", company, reference),
            status: *status,
            submitted_at: ago(now, *age, 6),
            replied_at: None,
            reply: None,
        })
        .collect()
}

fn download_requests(now: DateTime<Utc>) -> Vec<DownloadRequest> {
    let rows: &[(&str, &str, Option<&str>, &str, &str, &str, ReviewStatus, i64)] = &[
        ("Elena Petrova", "elena@metalsresearch.org", Some("Metals Research"), "Technical Data Sheet: Copper Cathode", "Technical", "Supplier qualification", ReviewStatus::New, 0),
        ("David Chen", "dchen@investco.com", Some("InvestCo"), "Annual Report 2025", "Reports", "Investment analysis", ReviewStatus::New, 2),
        ("Grace Mwangi", "grace@wiremakers.co.ke", Some("Wiremakers"), "Copper Rod Specification", "Technical", "Product evaluation", ReviewStatus::Reviewed, 5),
        ("Olivier Martin", "omartin@univ.fr", None, "Environmental Impact Assessment", "Sustainability", "Academic research", ReviewStatus::Approved, 12),
    ];

    rows.iter()
        .map(|(name, email, company, resource, category, purpose, status, age)| DownloadRequest {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            company: company.map(str::to_string),
            resource_id: None,
            resource_title: resource.to_string(),
            category: category.to_string(),
            purpose: purpose.to_string(),
            status: *status,
            submitted_at: ago(now, *age, 3),
            replied_at: None,
            reply: None,
        })
        .collect()
}

fn image(url: &str, caption: &str) -> GalleryImage {
    GalleryImage {
        id: Uuid::new_v4(),
        url: url.to_string(),
        caption: caption.to_string(),
        display_url: media::display_src(url).into_owned(),
    }
}

fn gallery(now: DateTime<Utc>, today: NaiveDate) -> Vec<GalleryItem> {
    vec![
        GalleryItem {
            id: Uuid::new_v4(),
            title: "Concentrator expansion".into(),
            date: day(today, -20),
            location: "Rio Cobre mine".into(),
            category: "Operations".into(),
            section: "operations".into(),
            images: vec![
                image("/uploads/gallery/concentrator-1.jpg", "New flotation cells"),
                image("/uploads/gallery/concentrator-2.jpg", "Control room"),
            ],
            status: PublishStatus::Published,
            created_at: ago(now, 20, 0),
        },
        GalleryItem {
            id: Uuid::new_v4(),
            title: "School science fair".into(),
            date: day(today, -45),
            location: "Valle Verde".into(),
            category: "Community".into(),
            section: "community".into(),
            images: vec![
                image("https://cdn.riocobre.example/gallery/fair-1.jpg", "Winning team"),
                image("fair-2.jpg", "Exhibits"),
            ],
            status: PublishStatus::Published,
            created_at: ago(now, 45, 0),
        },
        GalleryItem {
            id: Uuid::new_v4(),
            title: "Cathode shipment".into(),
            date: day(today, -3),
            location: "Port of Antofagasta".into(),
            category: "Logistics".into(),
            section: "operations".into(),
            images: vec![image("/uploads/gallery/shipment-1.jpg", "Loading")],
            status: PublishStatus::Draft,
            created_at: ago(now, 3, 0),
        },
    ]
}

fn resources(now: DateTime<Utc>) -> Vec<ResourceDocument> {
    let rows: &[(&str, &str, &str, u64, u64)] = &[
        ("Annual Report 2025", "Reports", "PDF", 8_400_000, 512),
        ("Annual Report 2024", "Reports", "PDF", 7_900_000, 1_204),
        ("Sustainability Report 2025", "Sustainability", "PDF", 5_200_000, 301),
        ("Environmental Impact Assessment", "Sustainability", "PDF", 12_600_000, 98),
        ("Technical Data Sheet: Copper Cathode", "Technical", "PDF", 420_000, 876),
        ("Copper Rod Specification", "Technical", "PDF", 380_000, 654),
        ("Copper Concentrate Assay Summary", "Technical", "XLSX", 96_000, 143),
        ("Safety Data Sheet: Sulphuric Acid", "Safety", "PDF", 310_000, 77),
        ("Corporate Brochure", "Brochures", "PDF", 3_100_000, 1_530),
        ("Product Catalogue", "Brochures", "PDF", 4_700_000, 990),
        ("Supplier Code of Conduct", "Procurement", "PDF", 260_000, 402),
        ("Tender Submission Guidelines", "Procurement", "DOCX", 180_000, 615),
        ("Quarterly Production Figures", "Reports", "XLSX", 64_000, 233),
        ("Community Investment Plan", "Sustainability", "PDF", 2_200_000, 58),
        ("Mine Closure Plan Summary", "Sustainability", "PDF", 1_900_000, 41),
        ("Quality Policy", "Quality", "PDF", 150_000, 120),
        ("ISO 14001 Certificate", "Quality", "PDF", 90_000, 187),
        ("Investor Presentation Q3", "Reports", "PPTX", 6_300_000, 276),
    ];

    rows.iter()
        .enumerate()
        .map(|(i, (title, category, file_type, size, downloads))| ResourceDocument {
            id: Uuid::new_v4(),
            title: title.to_string(),
            category: category.to_string(),
            file_type: file_type.to_string(),
            file_size_bytes: *size,
            description: String::new(),
            uploaded_at: ago(now, 5 * i as i64 + 1, 0),
            downloads: *downloads,
            status: if i % 7 == 6 { PublishStatus::Draft } else { PublishStatus::Published },
        })
        .collect()
}

fn jobs(today: NaiveDate) -> Vec<JobPosting> {
    let rows: &[(&str, &str, &str, EmploymentType, JobStatus, i64, u64)] = &[
        ("Process Metallurgist", "Processing", "Rio Cobre mine", EmploymentType::FullTime, JobStatus::Open, 7, 23),
        ("Maintenance Planner", "Maintenance", "Rio Cobre mine", EmploymentType::FullTime, JobStatus::Open, 14, 11),
        ("Graduate Geologist", "Exploration", "Valle Verde", EmploymentType::Internship, JobStatus::Draft, 0, 0),
        ("Logistics Coordinator", "Logistics", "Antofagasta", EmploymentType::Contract, JobStatus::Closed, 60, 48),
    ];

    rows.iter()
        .map(|(title, department, location, employment_type, status, age, applicants)| JobPosting {
            id: Uuid::new_v4(),
            title: title.to_string(),
            department: department.to_string(),
            location: location.to_string(),
            employment_type: *employment_type,
            description: format!("Join the {} team as {}.", department, title),
            requirements: lines(&["Relevant degree", "Valid driving licence"]),
            posted_date: day(today, -age),
            closing_date: Some(day(today, 30 - age)),
            status: *status,
            applicants: *applicants,
        })
        .collect()
}

fn pages(now: DateTime<Utc>) -> Vec<SitePage> {
    let rows: &[(&str, &str, u64)] = &[
        ("Home", "/", 15_230),
        ("Copper Cathodes", "/products/copper-cathodes", 8_410),
        ("Copper Rod", "/products/copper-rod", 6_020),
        ("Copper Concentrate", "/products/copper-concentrate", 3_870),
        ("Jobs", "/jobs", 5_960),
        ("Contact", "/contact", 4_480),
        ("About Us", "/about", 3_150),
        ("Sustainability", "/sustainability", 2_740),
        ("Media Centre", "/media", 1_980),
    ];

    rows.iter()
        .map(|(title, slug, views)| SitePage {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: slug.to_string(),
            summary: String::new(),
            status: PublishStatus::Published,
            views: *views,
            updated_at: ago(now, 10, 0),
        })
        .collect()
}

fn deadlines(today: NaiveDate) -> Vec<Deadline> {
    let rows: &[(&str, &str, i64, Priority, &[&str])] = &[
        ("Tailings sensors tender closes", "tender", 4, Priority::High, &["TND-2026-015", "Evaluate 2 bids"]),
        ("Water use permit renewal", "regulatory", 6, Priority::Critical, &["Submit to water authority"]),
        ("Conveyor tender closes", "tender", 20, Priority::Medium, &["TND-2026-014"]),
        ("Canteen contract renewal", "contract", 45, Priority::Low, &[]),
    ];

    rows.iter()
        .map(|(title, kind, offset, priority, details)| Deadline {
            id: Uuid::new_v4(),
            title: title.to_string(),
            deadline_type: kind.to_string(),
            due_date: day(today, *offset),
            days_left: *offset,
            priority: *priority,
            details: lines(details),
        })
        .collect()
}
