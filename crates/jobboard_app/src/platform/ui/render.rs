use chrono::TimeZone;
use jobboard_core::{format_date, format_time, AppViewModel, IdsView, JobRowView};
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::constants::*;
use super::layout::BoardAreas;

pub fn draw(
    frame: &mut Frame,
    areas: &BoardAreas,
    view: &AppViewModel,
    lines: Vec<Line<'static>>,
    scroll: usize,
    tick: u64,
) {
    let header = Paragraph::new(Line::from(Span::styled(
        TITLE,
        Style::default()
            .fg(Color::Rgb(255, 102, 0))
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, areas.header);

    // `lines` is already wrapped to the list width, so rows map 1:1 to lines.
    let list_title = format!(" Jobs ({}) ", view.jobs.len());
    let list = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(list_title))
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(list, areas.list);

    let status_style = match view.ids {
        _ if view.halted.is_some() => Style::default().fg(Color::Red),
        IdsView::Failed { .. } => Style::default().fg(Color::Red),
        _ if view.can_load_more => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default(),
    };
    let status = Paragraph::new(Span::styled(status_text(view, tick), status_style))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, areas.status);

    let footer = Paragraph::new(Span::styled(
        footer_text(view),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(footer, areas.footer);
}

/// Styled rows for the job list, one blank line between jobs. Every text is
/// broken into chunks of at most `width` characters, so the result has one
/// entry per terminal row.
pub fn job_lines<Tz>(view: &AppViewModel, tz: &Tz, width: usize) -> Vec<Line<'static>>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut lines = Vec::new();
    for (index, job) in view.jobs.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        match job {
            JobRowView::Job {
                title, url, by, time, ..
            } => {
                let title_style = match url {
                    Some(_) => Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    None => Style::default().add_modifier(Modifier::BOLD),
                };
                push_wrapped(&mut lines, title, title_style, width);
                let meta = format!(
                    "  By {} | {} | {}",
                    by,
                    format_date(*time, tz),
                    format_time(*time, tz)
                );
                push_wrapped(&mut lines, &meta, Style::default(), width);
                if let Some(url) = url {
                    let url = format!("  {url}");
                    push_wrapped(&mut lines, &url, Style::default().fg(Color::DarkGray), width);
                }
            }
            JobRowView::Unavailable { id, reason } => {
                let text = unavailable_text(*id, reason);
                push_wrapped(&mut lines, &text, Style::default().fg(Color::Red), width);
            }
        }
    }
    lines
}

fn push_wrapped(lines: &mut Vec<Line<'static>>, text: &str, style: Style, width: usize) {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        lines.push(Line::default());
        return;
    }
    for chunk in chars.chunks(width.max(1)) {
        lines.push(Line::from(Span::styled(
            chunk.iter().collect::<String>(),
            style,
        )));
    }
}

/// Plain-text rendering of one job, used by headless mode.
pub fn job_text<Tz>(job: &JobRowView, tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match job {
        JobRowView::Job {
            title, url, by, time, ..
        } => {
            let mut text = vec![title.clone()];
            if let Some(url) = url {
                text.push(format!("  {url}"));
            }
            text.push(format!(
                "  By {} | {} | {}",
                by,
                format_date(*time, tz),
                format_time(*time, tz)
            ));
            text
        }
        JobRowView::Unavailable { id, reason } => vec![unavailable_text(*id, reason)],
    }
}

fn unavailable_text(id: u64, reason: &str) -> String {
    format!("#{id} unavailable ({reason})")
}

/// Loading indicator XOR the load-more prompt, plus counts.
pub fn status_text(view: &AppViewModel, tick: u64) -> String {
    let spinner = SPINNER_FRAMES[(tick % SPINNER_FRAMES.len() as u64) as usize];
    if let Some(reason) = &view.halted {
        return format!("Engine stopped: {reason}. {} shown", view.jobs.len());
    }
    match &view.ids {
        IdsView::Loading => return format!("{spinner} Fetching job list..."),
        IdsView::Failed { reason } => return format!("Failed to load jobs: {reason}"),
        IdsView::Loaded { .. } if view.is_empty_board() => {
            return "No job postings right now.".to_string()
        }
        IdsView::Loaded { .. } => {}
    }

    let mut text = match view.batch {
        Some(batch) => format!(
            "{spinner} Loading jobs {}/{}...",
            batch.fetched, batch.size
        ),
        None if view.can_load_more => format!(
            "[ {LOAD_MORE_LABEL} ]  {} shown, {} remaining",
            view.jobs.len(),
            view.remaining
        ),
        None => format!("{} shown, all jobs loaded", view.jobs.len()),
    };
    if view.failed_jobs > 0 {
        text.push_str(&format!(", {} unavailable", view.failed_jobs));
    }
    text
}

pub fn footer_text(view: &AppViewModel) -> String {
    let mut hints = Vec::with_capacity(3);
    if view.can_load_more {
        hints.push(HINT_LOAD_MORE);
    }
    hints.push(HINT_SCROLL);
    hints.push(HINT_QUIT);
    hints.join("  ")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jobboard_core::BatchProgressView;

    use super::*;

    fn job(id: u64, url: Option<&str>) -> JobRowView {
        JobRowView::Job {
            id,
            title: format!("Company {id} is hiring"),
            url: url.map(str::to_string),
            by: "founder".to_string(),
            time: 1_704_467_045,
        }
    }

    fn loaded_view(jobs: Vec<JobRowView>, remaining: usize) -> AppViewModel {
        AppViewModel {
            ids: IdsView::Loaded {
                total: jobs.len() + remaining,
            },
            jobs,
            loading: false,
            batch: None,
            remaining,
            can_load_more: remaining > 0,
            halted: None,
            failed_jobs: 0,
            dirty: true,
        }
    }

    #[test]
    fn job_text_includes_link_author_date_and_time() {
        let text = job_text(&job(1, Some("https://acme.example/jobs")), &Utc);
        assert_eq!(
            text,
            vec![
                "Company 1 is hiring".to_string(),
                "  https://acme.example/jobs".to_string(),
                "  By founder | Jan 5, 2024 | 3:04:05 PM".to_string(),
            ]
        );
    }

    #[test]
    fn job_without_url_renders_plain_title() {
        let text = job_text(&job(2, None), &Utc);
        assert_eq!(text.len(), 2);
        assert_eq!(text[0], "Company 2 is hiring");
    }

    #[test]
    fn unavailable_job_renders_reason() {
        let row = JobRowView::Unavailable {
            id: 7,
            reason: "timeout".to_string(),
        };
        assert_eq!(job_text(&row, &Utc), vec!["#7 unavailable (timeout)"]);
    }

    #[test]
    fn job_lines_separate_jobs_with_blank_line() {
        let view = loaded_view(vec![job(1, Some("https://a.example")), job(2, None)], 0);
        let lines = job_lines(&view, &Utc, 80);
        // 3 lines for the linked job, a separator, 2 for the plain one.
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[3], Line::default());
    }

    #[test]
    fn job_lines_break_long_text_at_the_width() {
        let url = format!("https://jobs.example/{}", "x".repeat(100));
        let view = loaded_view(vec![job(1, Some(&url))], 0);
        let lines = job_lines(&view, &Utc, 40);

        assert!(lines.iter().all(|line| line.width() <= 40));
        // "  " + 121 url chars is 123 chars, four rows at 40.
        let url_rows = lines
            .iter()
            .filter(|line| line.spans.iter().any(|s| s.style.fg == Some(Color::DarkGray)))
            .count();
        assert_eq!(url_rows, 4);
        let joined: String = lines[lines.len() - url_rows..]
            .iter()
            .flat_map(|line| line.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert_eq!(joined, format!("  {url}"));
    }

    #[test]
    fn status_offers_load_more_only_when_idle_with_remaining() {
        let view = loaded_view(vec![job(1, None)], 2);
        let text = status_text(&view, 0);
        assert!(text.contains(LOAD_MORE_LABEL));
        assert!(text.contains("2 remaining"));
        assert!(footer_text(&view).contains(HINT_LOAD_MORE));

        let view = loaded_view(vec![job(1, None)], 0);
        assert_eq!(status_text(&view, 0), "1 shown, all jobs loaded");
        assert!(!footer_text(&view).contains(HINT_LOAD_MORE));
    }

    #[test]
    fn status_shows_indicator_while_loading() {
        let mut view = loaded_view(Vec::new(), 2);
        view.loading = true;
        view.can_load_more = false;
        view.batch = Some(BatchProgressView {
            fetched: 1,
            size: 6,
        });

        let text = status_text(&view, 1);
        assert_eq!(text, "/ Loading jobs 1/6...");
        assert!(!text.contains(LOAD_MORE_LABEL));
    }

    #[test]
    fn status_distinguishes_failure_from_empty() {
        let empty = loaded_view(Vec::new(), 0);
        assert_eq!(status_text(&empty, 0), "No job postings right now.");

        let failed = AppViewModel {
            ids: IdsView::Failed {
                reason: "network error".to_string(),
            },
            ..AppViewModel::default()
        };
        assert_eq!(
            status_text(&failed, 0),
            "Failed to load jobs: network error"
        );
    }

    #[test]
    fn status_reports_a_stopped_engine() {
        let mut view = loaded_view(vec![job(1, None)], 3);
        view.can_load_more = false;
        view.halted = Some("engine thread stopped".to_string());
        assert_eq!(
            status_text(&view, 0),
            "Engine stopped: engine thread stopped. 1 shown"
        );
        assert!(!footer_text(&view).contains(HINT_LOAD_MORE));
    }

    #[test]
    fn status_counts_unavailable_jobs() {
        let mut view = loaded_view(vec![job(1, None)], 0);
        view.failed_jobs = 1;
        assert_eq!(
            status_text(&view, 0),
            "1 shown, all jobs loaded, 1 unavailable"
        );
    }
}
