//! Embedded HTML/CSS/JS frontend for the Haven web dashboard.
//!
//! The whole single-page app is compiled into the binary as a string
//! constant. No external assets, no build tools, no CDN dependencies. All
//! derivation happens server-side; the page only renders the JSON it gets.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Haven</title>
<style>
:root {
  --bg: #f7f3fb;
  --surface: rgba(255,255,255,0.7);
  --border: rgba(255,255,255,0.6);
  --text: #2d2438;
  --text-muted: #7a6f86;
  --primary: #a46bd6;
  --accent: #e38fb8;
  --orange: #fb923c;
  --pink: #f472b6;
  --muted: #c4bccd;
  --red: #dc2626;
  --green: #15803d;
  --radius: 24px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
  min-height: 100vh;
}

.glass { background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius); box-shadow: 0 4px 20px rgba(80,40,120,0.06); }
.hidden { display: none !important; }
.muted { color: var(--text-muted); }

/* Login */
#login { display: flex; align-items: center; justify-content: center; min-height: 100vh; padding: 16px; }
#login .glass { width: 100%; max-width: 420px; padding: 32px; text-align: center; }
#login .logo { font-size: 40px; margin-bottom: 12px; }
#login h1 { font-size: 28px; margin-bottom: 4px; }
#login form { margin-top: 24px; text-align: left; }
#login label { font-size: 13px; font-weight: 500; }
#login input { width: 100%; height: 44px; margin: 8px 0 16px; padding: 0 14px; border-radius: 16px; border: 1px solid var(--muted); font-size: 14px; }
.btn { width: 100%; height: 44px; border: none; border-radius: 16px; background: linear-gradient(135deg, var(--primary), var(--accent)); color: #fff; font-weight: 600; cursor: pointer; }
.btn.outline { width: auto; height: 36px; padding: 0 16px; background: transparent; color: var(--text); border: 1px solid var(--muted); }

/* Dashboard */
nav { position: sticky; top: 0; display: flex; justify-content: space-between; align-items: center; padding: 14px 24px; border-radius: 0; }
nav h1 { font-size: 18px; }
main { max-width: 1200px; margin: 0 auto; padding: 24px; display: grid; gap: 24px; }
.welcome { padding: 28px; }
.welcome h2 { font-size: 22px; margin-bottom: 4px; }
.stats-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 20px; }
.stat-card { padding: 22px; }
.stat-card .value { font-size: 30px; font-weight: 700; margin: 4px 0; }
.columns { display: grid; grid-template-columns: 2fr 1fr; gap: 20px; }
@media (max-width: 900px) { .columns { grid-template-columns: 1fr; } }
.panel { padding: 22px; }
.panel-head { display: flex; justify-content: space-between; align-items: center; margin-bottom: 16px; }
table { width: 100%; border-collapse: collapse; }
th { text-align: left; font-size: 11px; text-transform: uppercase; color: var(--text-muted); padding: 10px 6px; }
td { padding: 12px 6px; border-top: 1px solid rgba(0,0,0,0.05); }
.pill { padding: 2px 10px; border-radius: 10px; font-size: 12px; font-weight: 500; }
.bg-orange-100 { background: #ffedd5; } .text-orange-700 { color: #c2410c; }
.bg-green-100 { background: #dcfce7; } .text-green-700 { color: var(--green); }
.bg-red-100 { background: #fee2e2; } .text-red-700 { color: #b91c1c; }
.bg-yellow-100 { background: #fef9c3; } .text-yellow-700 { color: #a16207; }
.bg-blue-100 { background: #dbeafe; } .text-blue-700 { color: #1d4ed8; }
.category { margin-bottom: 18px; }
.category .row { display: flex; justify-content: space-between; font-weight: 500; }
.track { height: 10px; border-radius: 6px; background: rgba(255,255,255,0.8); overflow: hidden; margin: 6px 0 2px; }
.track div { height: 100%; border-radius: 6px; transition: width 0.4s; }
.bg-primary { background: var(--primary); }
.bg-accent { background: var(--accent); }
.bg-orange-400 { background: var(--orange); }
.bg-pink-400 { background: var(--pink); }
.bg-muted { background: var(--muted); }
.empty { padding: 16px 0; color: var(--text-muted); }

/* Toast */
.toast { position: fixed; right: 20px; bottom: 20px; padding: 12px 18px; border-radius: 14px; background: #fff; box-shadow: 0 6px 24px rgba(0,0,0,0.12); opacity: 0; transition: opacity 0.2s; max-width: 320px; }
.toast.show { opacity: 1; }
.toast.destructive { background: var(--red); color: #fff; }
.toast strong { display: block; }
</style>
</head>
<body>

<section id="login">
  <div class="glass">
    <div class="logo">🌸</div>
    <h1>Haven</h1>
    <p class="muted">A safe space for everyone</p>
    <form id="login-form">
      <label for="password">Admin Password</label>
      <input id="password" type="password" placeholder="Enter password" autocomplete="current-password">
      <button class="btn" type="submit">Enter Dashboard</button>
    </form>
    <p class="muted" style="margin-top:24px;font-size:12px">Built with care for workplace safety 💜</p>
  </div>
</section>

<section id="dashboard" class="hidden">
  <nav class="glass">
    <div>
      <h1>🌸 Haven</h1>
      <span class="muted">Admin Dashboard</span>
    </div>
    <button class="btn outline" id="btn-logout">Logout</button>
  </nav>
  <main>
    <div class="glass welcome">
      <h2>Welcome back, Admin 👋</h2>
      <p class="muted">Here's what's happening with workplace safety today.</p>
    </div>
    <div class="stats-grid" id="stats"></div>
    <div class="columns">
      <div class="glass panel">
        <div class="panel-head">
          <div><h3>Recent Reports</h3><span class="muted">Latest anonymous submissions</span></div>
          <a class="btn outline" href="/api/reports.csv" download="reports.csv">Export</a>
        </div>
        <table>
          <thead><tr><th>ID</th><th>Type</th><th>Status</th><th>Date</th><th>Priority</th></tr></thead>
          <tbody id="reports"></tbody>
        </table>
      </div>
      <div class="glass panel">
        <div class="panel-head">
          <div><h3>Report Categories</h3><span class="muted">Breakdown by type</span></div>
        </div>
        <div id="categories"></div>
      </div>
    </div>
  </main>
</section>

<div class="toast" id="toast"></div>

<script>
let session = null;
// Each dashboard load gets a new controller; a superseded load is aborted
// and its late result ignored.
let loadController = null;

function esc(s) {
  return String(s).replace(/[&<>"']/g, c => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' }[c]));
}

function toast(n) {
  const el = document.getElementById('toast');
  el.innerHTML = '<strong>' + esc(n.title) + '</strong>' + esc(n.description);
  el.className = 'toast show' + (n.variant === 'destructive' ? ' destructive' : '');
  setTimeout(() => el.className = 'toast', 3000);
}

function show(id) {
  document.getElementById('login').classList.toggle('hidden', id !== 'login');
  document.getElementById('dashboard').classList.toggle('hidden', id !== 'dashboard');
}

async function login(ev) {
  ev.preventDefault();
  const password = document.getElementById('password').value;
  try {
    const res = await fetch('/api/login', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ password }),
    });
    const data = await res.json();
    toast(data.notification);
    if (data.granted) {
      session = data.token;
      history.pushState({}, '', data.redirect);
      show('dashboard');
      loadDashboard();
      loadReports();
    }
  } catch (e) {
    console.error('login failed', e);
  }
}

function logout() {
  if (session) {
    fetch('/api/logout', { method: 'POST', headers: { 'X-Haven-Session': session } })
      .catch(e => console.error('logout failed', e));
  }
  session = null;
  if (loadController) loadController.abort();
  history.pushState({}, '', '/');
  show('login');
}

function renderStats(cards) {
  document.getElementById('stats').innerHTML = cards.map(c =>
    '<div class="glass stat-card">' +
      '<div class="muted">' + esc(c.title) + '</div>' +
      '<div class="value">' + esc(c.value) + '</div>' +
      '<div class="muted" style="font-size:12px">' + esc(c.trend) + '</div>' +
    '</div>').join('');
}

function renderCategories(categories) {
  const el = document.getElementById('categories');
  if (!categories.length) {
    el.innerHTML = '<div class="empty">No category data.</div>';
    return;
  }
  el.innerHTML = categories.map(c => {
    const width = Math.max(0, Math.min(100, c.percentage));
    return '<div class="category">' +
      '<div class="row"><span>' + esc(c.name) + '</span><span>' + c.count + '</span></div>' +
      '<div class="track"><div class="' + esc(c.color_tag) + '" style="width:' + width + '%"></div></div>' +
      '<div class="muted" style="font-size:12px">' + Math.round(c.percentage) + '% of total</div>' +
    '</div>';
  }).join('');
}

async function loadDashboard() {
  if (loadController) loadController.abort();
  const controller = new AbortController();
  loadController = controller;
  renderStats([]);
  renderCategories([]);
  try {
    const res = await fetch('/api/dashboard', { headers: { 'X-Haven-Session': session || '' }, signal: controller.signal });
    const data = await res.json();
    if (controller !== loadController) return;
    if (res.status === 401) { logout(); return; }
    renderStats(data.stat_cards);
    renderCategories(data.categories);
  } catch (e) {
    if (e.name !== 'AbortError') console.error('analytics load failed', e);
  }
}

async function loadReports() {
  try {
    const res = await fetch('/api/reports');
    const data = await res.json();
    document.getElementById('reports').innerHTML = data.reports.map(r =>
      '<tr><td><strong>' + esc(r.id) + '</strong></td><td>' + esc(r.type) + '</td>' +
      '<td><span class="pill ' + esc(r.status_tag) + '">' + esc(r.status) + '</span></td>' +
      '<td class="muted">' + esc(r.date) + '</td>' +
      '<td><span class="pill ' + esc(r.priority_tag) + '">' + esc(r.priority) + '</span></td></tr>').join('');
  } catch (e) {
    console.error('reports load failed', e);
  }
}

document.getElementById('login-form').addEventListener('submit', login);
document.getElementById('btn-logout').addEventListener('click', logout);
show('login');
</script>
</body>
</html>
"##;
