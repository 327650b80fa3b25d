//! Public booking page

use axum::{Router, extract::State, response::Html, routing::get};
use chrono::{Datelike, Months, NaiveDate};
use tracing::error;

use staybook_core::date::format_date;
use staybook_core::{CalendarBlocks, classify_calendar};

use crate::config::PropertyConfig;
use crate::html::escape;
use crate::state::AppState;

const MONTHS_SHOWN: u32 = 3;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// GET / - Calendar and request form
async fn index(State(state): State<AppState>) -> Html<String> {
    let today = state.today();
    let blocks = match state.store.active_bookings(today).await {
        Ok(bookings) => Some(classify_calendar(&bookings)),
        Err(e) => {
            error!(error = %e, "failed to load availability for the booking page");
            None
        }
    };

    Html(render_page(&state.property, today, blocks.as_ref()))
}

fn render_page(property: &PropertyConfig, today: NaiveDate, blocks: Option<&CalendarBlocks>) -> String {
    let first_month = today.with_day(1).unwrap_or(today);
    let empty = CalendarBlocks::default();

    let months: String = (0..MONTHS_SHOWN)
        .filter_map(|i| first_month.checked_add_months(Months::new(i)))
        .map(|month| render_month(month, today, blocks.unwrap_or(&empty)))
        .collect();

    let notice = match blocks {
        None => r#"<p class="notice">Availability could not be loaded right now. You can still send a request.</p>"#,
        Some(b) if !b.soft_blocks.is_empty() => {
            r#"<p class="hint"><span class="swatch"></span> Yellow dates are pending but can still be requested</p>"#
        }
        Some(_) => "",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{name}</title>
    <style>{style}</style>
  </head>
  <body>
    <header>
      <span class="location">{location}</span>
      <h1>{name}.</h1>
      <p>{address}</p>
    </header>
    <main>
      <section class="calendar">
        {months}
        {notice}
      </section>
      <section class="request">
        <h3>Request to Stay</h3>
        <form id="booking-form">
          <label>Dates</label>
          <div class="dates">
            <input type="date" name="startDate" min="{today}" required aria-label="Check-in">
            <input type="date" name="endDate" min="{today}" required aria-label="Check-out">
          </div>
          <label>Your Details</label>
          <input type="text" name="name" placeholder="Full Name" required>
          <input type="email" name="email" placeholder="Email Address" required>
          <label>Notes <span class="optional">(Optional)</span></label>
          <textarea name="notes" rows="3" placeholder="Any special requests or details?"></textarea>
          <p id="form-error" class="error" hidden></p>
          <button type="submit">Request Booking</button>
        </form>
        <div id="form-success" hidden>
          <h4>Request Sent!</h4>
          <p>We've received your booking request. Check your email for confirmation.</p>
          <button type="button" id="request-again">Make another request</button>
        </div>
      </section>
    </main>
    <footer>&copy; {year} {hosts}. {address}</footer>
    <script>{script}</script>
  </body>
</html>"#,
        name = escape(&property.name),
        location = escape(&property.location),
        address = escape(&property.address),
        hosts = escape(&property.hosts),
        today = format_date(today),
        year = today.year(),
        style = STYLE,
        script = SCRIPT,
    )
}

fn render_month(first: NaiveDate, today: NaiveDate, blocks: &CalendarBlocks) -> String {
    let mut cells = String::new();
    for _ in 0..first.weekday().num_days_from_sunday() {
        cells.push_str("<td></td>");
    }

    for (i, day) in first
        .iter_days()
        .take_while(|d| d.month() == first.month())
        .enumerate()
    {
        let class = if day < today {
            "day past"
        } else if blocks.is_turnover(day) {
            "day blocked turnover"
        } else if blocks.is_hard_blocked(day) {
            "day blocked"
        } else if blocks.is_soft_blocked(day) {
            "day pending"
        } else {
            "day open"
        };
        cells.push_str(&format!(
            r#"<td class="{class}" data-date="{date}">{n}</td>"#,
            date = format_date(day),
            n = day.day(),
        ));

        let column = i as u32 + first.weekday().num_days_from_sunday() + 1;
        if column % 7 == 0 {
            cells.push_str("</tr><tr>");
        }
    }

    format!(
        r#"<table class="month">
          <caption>{title}</caption>
          <thead><tr><th>Su</th><th>Mo</th><th>Tu</th><th>We</th><th>Th</th><th>Fr</th><th>Sa</th></tr></thead>
          <tbody><tr>{cells}</tr></tbody>
        </table>"#,
        title = first.format("%B %Y"),
    )
}

const STYLE: &str = r#"
      body { font-family: 'Helvetica Neue', Helvetica, Arial, sans-serif; background: #fafaf9; color: #1c1917; margin: 0; }
      header { background: #1c1917; color: #fff; padding: 64px 24px 48px; }
      header .location { font-size: 13px; letter-spacing: 0.2em; text-transform: uppercase; opacity: 0.9; }
      header h1 { font-size: 56px; margin: 12px 0; letter-spacing: -0.03em; }
      main { display: flex; flex-wrap: wrap; gap: 48px; padding: 48px 24px; max-width: 1100px; margin: 0 auto; }
      .calendar { flex: 1 1 480px; display: flex; flex-wrap: wrap; gap: 24px; align-content: flex-start; }
      .month { border-collapse: collapse; }
      .month caption { font-weight: 600; padding-bottom: 8px; }
      .month th { font-size: 12px; color: #78716c; font-weight: 500; }
      .month td { width: 36px; height: 36px; text-align: center; border-radius: 6px; font-size: 14px; }
      .day.open { cursor: pointer; }
      .day.open:hover, .day.selected { background: #1c1917; color: #fff; }
      .day.past { color: #d6d3d1; }
      .day.blocked { color: #a8a29e; text-decoration: line-through; background: #f5f5f4; }
      .day.pending { background: #fef08a; cursor: pointer; }
      .day.turnover { cursor: pointer; }
      .hint, .notice { font-size: 12px; color: #78716c; width: 100%; }
      .swatch { display: inline-block; width: 8px; height: 8px; border-radius: 50%; background: #fef08a; }
      .request { flex: 0 1 380px; background: #fff; padding: 32px; border-radius: 16px; border: 1px solid #e7e5e4; }
      .request label { display: block; font-size: 14px; font-weight: 500; margin: 16px 0 6px; }
      .request input, .request textarea { width: 100%; box-sizing: border-box; padding: 10px 12px; border: 1px solid #e7e5e4; border-radius: 8px; margin-bottom: 8px; font: inherit; }
      .request .dates { display: flex; gap: 8px; }
      .request .optional { color: #a8a29e; font-weight: 400; }
      .request button { width: 100%; padding: 12px; background: #1c1917; color: #fff; border: 0; border-radius: 8px; font-weight: 500; cursor: pointer; margin-top: 8px; }
      .request button:disabled { opacity: 0.5; }
      .error { color: #dc2626; background: #fef2f2; padding: 10px; border-radius: 8px; font-size: 14px; }
      footer { background: #1c1917; color: #a8a29e; padding: 32px 24px; font-size: 13px; }
"#;

const SCRIPT: &str = r#"
      (function () {
        var form = document.getElementById('booking-form');
        var errorBox = document.getElementById('form-error');
        var success = document.getElementById('form-success');
        var checkIn = form.elements.startDate;
        var checkOut = form.elements.endDate;

        document.querySelectorAll('.day.open, .day.pending').forEach(function (cell) {
          cell.addEventListener('click', function () {
            var date = cell.dataset.date;
            if (!checkIn.value || checkOut.value || date <= checkIn.value) {
              checkIn.value = date;
              checkOut.value = '';
            } else {
              checkOut.value = date;
            }
          });
        });

        // The first night of an approved stay is only a check-out day
        document.querySelectorAll('.day.turnover').forEach(function (cell) {
          cell.addEventListener('click', function () {
            var date = cell.dataset.date;
            if (checkIn.value && !checkOut.value && date > checkIn.value) {
              checkOut.value = date;
            }
          });
        });

        document.getElementById('request-again').addEventListener('click', function () {
          success.hidden = true;
          errorBox.hidden = true;
          form.hidden = false;
        });

        form.addEventListener('submit', function (event) {
          event.preventDefault();
          errorBox.hidden = true;
          var button = form.querySelector('button');
          button.disabled = true;
          button.textContent = 'Sending Request...';

          var body = {
            name: form.elements.name.value,
            email: form.elements.email.value,
            startDate: checkIn.value,
            endDate: checkOut.value,
            notes: form.elements.notes.value
          };

          fetch('/book', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(body)
          })
            .then(function (res) {
              return res.json().catch(function () { return {}; }).then(function (data) {
                if (!res.ok) throw new Error(data.error || 'Something went wrong');
              });
            })
            .then(function () {
              form.reset();
              form.hidden = true;
              success.hidden = false;
            })
            .catch(function (err) {
              errorBox.textContent = err.message || 'Something went wrong';
              errorBox.hidden = false;
            })
            .finally(function () {
              button.disabled = false;
              button.textContent = 'Request Booking';
            });
        });
      })();
"#;
