use crate::config::IntervalUnit;
use crate::models::StateResponse;

pub fn render_index(view: &StateResponse) -> String {
    let settings = &view.settings;
    INDEX_HTML
        .replace("{{DATE}}", &view.date)
        .replace("{{PERCENT}}", &view.progress.percent.to_string())
        .replace("{{CONSUMED}}", &view.progress.label)
        .replace("{{GOAL}}", &view.progress.goal_label)
        .replace("{{NEXT_REMINDER}}", &view.reminder.next_label)
        .replace("{{GOAL_VALUE}}", &blank_if_zero(settings.daily_goal as f64))
        .replace("{{INTERVAL_VALUE}}", &blank_if_zero(settings.interval))
        .replace("{{INTERVAL_UNIT}}", unit_label(settings.interval_unit))
        .replace(
            "{{WINDOW_CHECKED}}",
            if settings.start_window_enabled { "checked" } else { "" },
        )
        .replace("{{WINDOW_START}}", &escape_attr(&settings.window_start))
        .replace("{{WINDOW_END}}", &escape_attr(&settings.window_end))
}

// Window bounds are stored as typed, so they may hold markup.
fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn blank_if_zero(value: f64) -> String {
    if value > 0.0 { value.to_string() } else { String::new() }
}

fn unit_label(unit: IntervalUnit) -> &'static str {
    match unit {
        IntervalUnit::Minutes => "minutes",
        IntervalUnit::Hours => "hours",
    }
}

pub const SERVICE_WORKER_JS: &str = r#"self.addEventListener('install', (event) => {
  self.skipWaiting();
});

self.addEventListener('activate', (event) => {
  event.waitUntil(self.clients.claim());
});

self.addEventListener('notificationclick', (event) => {
  event.notification.close();
  event.waitUntil(
    self.clients.matchAll({ type: 'window' }).then((clients) => {
      if (clients.length) {
        return clients[0].focus();
      }
      return self.clients.openWindow('/');
    })
  );
});
"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Hydration Tracker</title>
  <style>
    :root {
      --bg-1: #e8f4f8;
      --bg-2: #b9e2f0;
      --ink: #1f2d3a;
      --accent: #2b8fd6;
      --accent-2: #174a6b;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(23, 74, 107, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #f4fbfd 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(560px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: baseline;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
      font-size: 2rem;
    }

    .subtitle {
      margin: 0;
      color: #5a6b78;
    }

    .track {
      height: 22px;
      border-radius: 999px;
      background: #d7e9f2;
      overflow: hidden;
    }

    #progress-bar {
      height: 100%;
      background: linear-gradient(90deg, var(--accent), #5fc3f0);
      transition: width 300ms ease;
    }

    .totals {
      display: flex;
      justify-content: space-between;
      font-size: 1.1rem;
    }

    .actions {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
    }

    button {
      border: none;
      border-radius: 14px;
      padding: 12px 18px;
      font-size: 1rem;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.secondary {
      background: #e3eef4;
      color: var(--accent-2);
    }

    .custom {
      display: flex;
      gap: 8px;
    }

    input[type="number"],
    input[type="time"] {
      padding: 10px;
      border-radius: 10px;
      border: 1px solid #c3d6e0;
      font-size: 1rem;
    }

    .reminder {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    #settings-modal {
      position: fixed;
      inset: 0;
      background: rgba(20, 40, 55, 0.45);
      display: grid;
      place-items: center;
    }

    #settings-modal.hidden {
      display: none;
    }

    .sheet {
      background: white;
      border-radius: 22px;
      padding: 24px;
      width: min(420px, 92vw);
      display: grid;
      gap: 14px;
    }

    .sheet label {
      display: grid;
      gap: 6px;
    }

    .status {
      min-height: 1.2em;
      color: #5a6b78;
    }

    .status[data-type="error"] {
      color: #b3261e;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Hydration</h1>
      <p class="subtitle" id="date">{{DATE}}</p>
    </header>

    <section>
      <div class="track"><div id="progress-bar" style="width: {{PERCENT}}%"></div></div>
      <div class="totals">
        <span id="consumed">{{CONSUMED}}</span>
        <span>Goal: <strong id="goal-label">{{GOAL}}</strong></span>
      </div>
    </section>

    <section class="actions">
      <button type="button" data-amount="250">+250 ml</button>
      <button type="button" data-amount="500">+500 ml</button>
      <form class="custom" id="custom-form">
        <input id="custom-amount" type="number" min="1" placeholder="ml" />
        <button type="submit">Log</button>
      </form>
    </section>

    <section class="reminder">
      <span>Next reminder: <strong id="next-reminder">{{NEXT_REMINDER}}</strong></span>
      <span id="countdown" class="subtitle"></span>
    </section>

    <section class="actions">
      <button type="button" class="secondary" id="notify-btn">Enable reminders</button>
      <button type="button" class="secondary" id="open-settings">Settings</button>
      <button type="button" class="secondary" id="reset-now">Reset today</button>
    </section>

    <div class="status" id="status"></div>
  </main>

  <div id="settings-modal" class="hidden" aria-hidden="true">
    <form class="sheet" id="settings-form">
      <h2>Settings</h2>
      <label>Daily goal (ml)
        <input id="daily-goal" type="number" min="1" value="{{GOAL_VALUE}}" />
      </label>
      <label>Reminder interval ({{INTERVAL_UNIT}})
        <input id="interval" type="number" min="0" step="any" value="{{INTERVAL_VALUE}}" />
      </label>
      <label><span><input id="start-window-enabled" type="checkbox" {{WINDOW_CHECKED}} /> Only remind between</span></label>
      <div class="custom">
        <input id="window-start" type="time" value="{{WINDOW_START}}" />
        <input id="window-end" type="time" value="{{WINDOW_END}}" />
      </div>
      <div class="actions">
        <button type="submit" id="save-settings">Save</button>
        <button type="button" class="secondary" id="close-settings">Close</button>
      </div>
    </form>
  </div>

  <script>
    const $ = (id) => document.getElementById(id);
    const modal = $('settings-modal');
    let view = null;
    let lastNotification = 0;

    if ('serviceWorker' in navigator) {
      navigator.serviceWorker.register('/service-worker.js').catch((err) => console.log('service worker registration failed', err));
    }

    const setStatus = (message, type) => {
      $('status').textContent = message || '';
      $('status').dataset.type = type || '';
    };

    const render = (data) => {
      view = data;
      $('date').textContent = data.date;
      $('progress-bar').style.width = `${data.progress.percent}%`;
      $('consumed').textContent = data.progress.label;
      $('goal-label').textContent = data.progress.goal_label;
      $('next-reminder').textContent = data.reminder.next_label;
      renderCountdown();
    };

    const renderCountdown = () => {
      const el = $('countdown');
      if (!view || view.reminder.mode !== 'countdown' || !view.reminder.next_at) {
        el.textContent = '';
        return;
      }
      const remaining = Math.max(0, Math.ceil((new Date(view.reminder.next_at) - new Date()) / 60000));
      el.textContent = `in ${remaining} min`;
    };

    const request = async (url, body) => {
      const res = await fetch(url, body === undefined ? {} : {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body)
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.json();
    };

    const refresh = async () => render(await request('/api/state'));

    const logWater = async (amount) => {
      const data = await request('/api/log', { amount });
      render(data);
      window.location.href = data.shortcut_url;
    };

    const openSettings = () => {
      modal.classList.remove('hidden');
      modal.setAttribute('aria-hidden', 'false');
    };

    const closeSettings = () => {
      modal.classList.add('hidden');
      modal.setAttribute('aria-hidden', 'true');
    };

    const saveSettings = async () => {
      render(await request('/api/settings', {
        daily_goal: $('daily-goal').value,
        interval: $('interval').value,
        start_window_enabled: $('start-window-enabled').checked,
        window_start: $('window-start').value,
        window_end: $('window-end').value
      }));
      closeSettings();
    };

    const enableReminders = async () => {
      let permission = 'default';
      if ('Notification' in window) {
        permission = await Notification.requestPermission();
      }
      const data = await request('/api/reminders/enable', { permission });
      render(data);
      if (permission !== 'granted') {
        alert(data.message);
      } else {
        setStatus(data.message, 'ok');
      }
    };

    const show = (note) => {
      if (note.display === 'notification' && 'Notification' in window && Notification.permission === 'granted') {
        new Notification(note.title, { body: note.body, icon: note.icon });
      } else {
        alert(`${note.title}\n${note.body}`);
      }
    };

    const poll = async () => {
      const data = await request(`/api/notifications?after=${lastNotification}`);
      data.notifications.forEach((note) => {
        lastNotification = Math.max(lastNotification, note.id);
        show(note);
      });
      if (data.notifications.length) {
        await refresh();
      }
    };

    const fail = (err) => setStatus(err.message, 'error');

    document.querySelectorAll('[data-amount]').forEach((button) => {
      button.addEventListener('click', () => logWater(Number(button.dataset.amount)).catch(fail));
    });
    $('custom-form').addEventListener('submit', (event) => {
      event.preventDefault();
      logWater(Number($('custom-amount').value)).catch(fail);
    });
    $('settings-form').addEventListener('submit', (event) => {
      event.preventDefault();
      saveSettings().catch(fail);
    });
    $('open-settings').addEventListener('click', openSettings);
    $('close-settings').addEventListener('click', closeSettings);
    $('reset-now').addEventListener('click', () => {
      request('/api/reset', {}).then((data) => {
        render(data);
        setStatus('Progress reset for today.', 'ok');
      }).catch(fail);
    });
    $('notify-btn').addEventListener('click', () => enableReminders().catch(fail));

    refresh().catch(fail);
    request('/api/notifications').then((data) => {
      data.notifications.forEach((note) => { lastNotification = Math.max(lastNotification, note.id); });
    }).catch(fail);
    setInterval(() => poll().catch(fail), 15000);
    setInterval(renderCountdown, 30000);
    setInterval(() => refresh().catch(fail), 60000);
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReminderMode;
    use crate::models::{AppData, ReminderView, SettingsView};
    use crate::progress::present;

    #[test]
    fn index_carries_current_values() {
        let data = AppData {
            total_consumed: 750,
            ..AppData::with_goal(2000)
        };
        let view = StateResponse {
            date: "2026-06-01".to_string(),
            progress: present(&data),
            settings: SettingsView {
                daily_goal: 2000,
                interval: 0.0,
                interval_unit: IntervalUnit::Hours,
                start_window_enabled: true,
                window_start: "08:00".to_string(),
                window_end: "20:00".to_string(),
            },
            reminder: ReminderView {
                mode: ReminderMode::Enumerate,
                enabled: false,
                next_label: "—".to_string(),
                next_at: None,
                minutes_remaining: None,
                scheduled_count: 0,
            },
        };

        let html = render_index(&view);
        assert!(html.contains("style=\"width: 37.5%\""));
        assert!(html.contains("750 ml / 2000 ml"));
        assert!(html.contains("Reminder interval (hours)"));
        assert!(html.contains("id=\"interval\" type=\"number\" min=\"0\" step=\"any\" value=\"\""));
        assert!(html.contains("type=\"checkbox\" checked"));
        assert!(!html.contains("{{"));
    }
}
