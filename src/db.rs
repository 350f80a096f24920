use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::profile::{CompanyProfile, PersonRecord};

pub const DEFAULT_DB_PATH: &str = "data/profiles.sqlite";

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS companies (
            id          INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            url         TEXT NOT NULL,
            about       TEXT,
            mission     TEXT,
            email       TEXT,
            phone       TEXT,
            scraped_at  TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_companies_url ON companies(url);

        CREATE TABLE IF NOT EXISTS people (
            id          INTEGER PRIMARY KEY,
            company_id  INTEGER NOT NULL REFERENCES companies(id),
            role        TEXT NOT NULL CHECK(role IN ('founder','team')),
            name        TEXT NOT NULL,
            title       TEXT,
            bio         TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_people_company ON people(company_id);

        CREATE TABLE IF NOT EXISTS testimonials (
            id          INTEGER PRIMARY KEY,
            company_id  INTEGER NOT NULL REFERENCES companies(id),
            text        TEXT NOT NULL,
            author      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_testimonials_company ON testimonials(company_id);
        ",
    )?;
    Ok(())
}

/// Stores one crawl result. Every crawl is a new row; history is kept.
pub fn save_profile(conn: &Connection, profile: &CompanyProfile) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    let company_id = {
        tx.execute(
            "INSERT INTO companies (name, url, about, mission, email, phone, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                profile.company_name,
                profile.url,
                profile.about,
                profile.mission,
                profile.contact_info.email,
                profile.contact_info.phone,
                profile.scraped_at.format(TIMESTAMP_FMT).to_string(),
            ],
        )?;
        let company_id = tx.last_insert_rowid();

        let mut p_stmt = tx.prepare(
            "INSERT INTO people (company_id, role, name, title, bio)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        let people = people_with_role(&profile.founders, "founder")
            .chain(people_with_role(&profile.team_members, "team"));
        for (role, p) in people {
            p_stmt.execute(rusqlite::params![company_id, role, p.name, p.title, p.bio])?;
        }

        let mut t_stmt = tx.prepare(
            "INSERT INTO testimonials (company_id, text, author) VALUES (?1, ?2, ?3)",
        )?;
        for t in &profile.testimonials {
            t_stmt.execute(rusqlite::params![company_id, t.text, t.author])?;
        }
        company_id
    };
    tx.commit()?;
    Ok(company_id)
}

fn people_with_role<'a>(
    people: &'a [PersonRecord],
    role: &'static str,
) -> impl Iterator<Item = (&'static str, &'a PersonRecord)> {
    people.iter().map(move |p| (role, p))
}

// ── Overview ──

pub struct OverviewRow {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub founders: usize,
    pub team: usize,
    pub testimonials: usize,
    pub has_contact: bool,
    pub scraped_at: String,
}

/// Most recent crawls first.
pub fn fetch_overview(conn: &Connection, limit: usize) -> Result<Vec<OverviewRow>> {
    let sql = format!(
        "SELECT c.id, c.name, c.url,
                (SELECT COUNT(*) FROM people p WHERE p.company_id = c.id AND p.role = 'founder'),
                (SELECT COUNT(*) FROM people p WHERE p.company_id = c.id AND p.role = 'team'),
                (SELECT COUNT(*) FROM testimonials t WHERE t.company_id = c.id),
                (c.email IS NOT NULL OR c.phone IS NOT NULL),
                c.scraped_at
         FROM companies c
         ORDER BY c.scraped_at DESC, c.id DESC
         LIMIT {}",
        limit
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(OverviewRow {
                id: row.get(0)?,
                name: row.get(1)?,
                url: row.get(2)?,
                founders: row.get(3)?,
                team: row.get(4)?,
                testimonials: row.get(5)?,
                has_contact: row.get(6)?,
                scraped_at: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub crawls: usize,
    pub sites: usize,
    pub founders: usize,
    pub team_members: usize,
    pub testimonials: usize,
    pub with_contact: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let crawls: usize = conn.query_row("SELECT COUNT(*) FROM companies", [], |r| r.get(0))?;
    let sites: usize =
        conn.query_row("SELECT COUNT(DISTINCT url) FROM companies", [], |r| r.get(0))?;
    let founders: usize = conn.query_row(
        "SELECT COUNT(*) FROM people WHERE role = 'founder'",
        [],
        |r| r.get(0),
    )?;
    let team_members: usize =
        conn.query_row("SELECT COUNT(*) FROM people WHERE role = 'team'", [], |r| r.get(0))?;
    let testimonials: usize =
        conn.query_row("SELECT COUNT(*) FROM testimonials", [], |r| r.get(0))?;
    let with_contact: usize = conn.query_row(
        "SELECT COUNT(*) FROM companies WHERE email IS NOT NULL OR phone IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        crawls,
        sites,
        founders,
        team_members,
        testimonials,
        with_contact,
    })
}
