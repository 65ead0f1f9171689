//! Embedded HTML/CSS/JS frontend for the scoring dashboard.
//!
//! The entire page is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies. The page only
//! displays what the JSON API returns: the form is built from
//! `/api/form` and charts arrive as ready-made SVG.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Tableau de bord – Scoring de Crédit</title>
<style>
:root {
  --bg: #f4f6fa;
  --surface: #ffffff;
  --border: #dde3ec;
  --text: #1e293b;
  --text-muted: #64748b;
  --accent: #2563eb;
  --green: #27ae60;
  --green-bg: #e8f7ee;
  --yellow: #b7791f;
  --yellow-bg: #fdf6e3;
  --red: #e74c3c;
  --red-bg: #fdecea;
  --radius: 8px;
  --font: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

/* Layout */
.app {
  max-width: 1100px;
  margin: 0 auto;
  padding: 24px;
}

header {
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
  display: flex;
  justify-content: space-between;
  align-items: flex-end;
}

header h1 { font-size: 26px; font-weight: 600; }
header .subtitle { color: var(--text-muted); font-size: 14px; }

.health-badges { display: flex; gap: 8px; }

.badge {
  display: inline-flex;
  align-items: center;
  gap: 4px;
  padding: 4px 10px;
  border-radius: 12px;
  font-size: 12px;
  background: var(--surface);
  border: 1px solid var(--border);
}
.badge.ok { border-color: var(--green); color: var(--green); }
.badge.warn { border-color: var(--yellow); color: var(--yellow); }

/* Navigation */
nav {
  display: flex;
  gap: 4px;
  margin-bottom: 24px;
  background: var(--surface);
  border-radius: var(--radius);
  padding: 4px;
  border: 1px solid var(--border);
}

nav button {
  flex: 1;
  padding: 8px 16px;
  border: none;
  border-radius: 6px;
  background: transparent;
  color: var(--text-muted);
  font-size: 14px;
  font-weight: 500;
  cursor: pointer;
}
nav button:hover { color: var(--text); background: rgba(0,0,0,0.03); }
nav button.active { background: var(--accent); color: #fff; }

.panel { display: none; }
.panel.active { display: block; }

/* Cards */
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}
.card h2 { font-size: 17px; font-weight: 600; margin-bottom: 16px; }

/* Form */
.form-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 0 24px; }
.field { margin-bottom: 12px; display: flex; flex-direction: column; gap: 4px; }
.field label { font-size: 13px; color: var(--text-muted); }
.field input, .field select, select#client-select {
  padding: 7px 10px;
  border: 1px solid var(--border);
  border-radius: 6px;
  font-size: 14px;
  background: #fff;
  color: var(--text);
}

.btn {
  padding: 9px 18px;
  border-radius: 6px;
  border: none;
  font-size: 14px;
  font-weight: 500;
  cursor: pointer;
  background: var(--accent);
  color: #fff;
}
.btn:disabled { opacity: 0.6; cursor: wait; }

/* Banners */
.banner {
  padding: 12px 16px;
  border-radius: 6px;
  margin-bottom: 16px;
  font-weight: 500;
  border-left: 4px solid;
}
.banner.success { background: var(--green-bg); color: var(--green); border-color: var(--green); }
.banner.error { background: var(--red-bg); color: var(--red); border-color: var(--red); }
.banner.warning { background: var(--yellow-bg); color: var(--yellow); border-color: var(--yellow); }

/* Charts */
.charts { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; align-items: center; }
.charts .wide { grid-column: 1 / span 2; }
.chart { background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius); padding: 8px; }

/* Client cards */
.client-cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr)); gap: 10px; margin: 16px 0; }
.client-card { border: 1px solid var(--border); border-radius: 6px; padding: 10px 12px; }
.client-card .label { font-size: 12px; color: var(--text-muted); }
.client-card .value { font-size: 16px; font-weight: 600; }

.muted { color: var(--text-muted); }
</style>
</head>
<body>
<div class="app">

  <header>
    <div>
      <h1>Tableau de bord – Scoring de Crédit</h1>
      <div class="subtitle">Évaluez une demande ou explorez les données clients.</div>
    </div>
    <div class="health-badges" id="health-badges"></div>
  </header>

  <nav id="nav">
    <button class="active" data-panel="predict">📈 Prédiction</button>
    <button data-panel="client">🔍 Infos Client</button>
  </nav>

  <!-- Prediction tab -->
  <div class="panel active" id="panel-predict">
    <div class="card">
      <h2>Informations du demandeur</h2>
      <form id="predict-form">
        <div class="form-grid">
          <div id="form-col-1"></div>
          <div id="form-col-2"></div>
        </div>
        <button class="btn" type="submit" id="btn-predict">Évaluer</button>
      </form>
    </div>
    <div id="predict-result"></div>
  </div>

  <!-- Client tab -->
  <div class="panel" id="panel-client">
    <div class="card">
      <h2>Infos Client</h2>
      <div id="client-picker" class="field"></div>
      <div id="client-details"></div>
    </div>
    <div id="client-result"></div>
  </div>

</div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let formSchema = null;
let clientsLoaded = false;
let selectedClient = null;

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  let data = null;
  try { data = await res.json(); } catch (e) { data = { error: res.statusText }; }
  return { ok: res.ok, status: res.status, data };
}

function banner(kind, msg) {
  return `<div class="banner ${kind}">${esc(msg)}</div>`;
}

function errorBanner(data) {
  const kind = data && data.kind === 'client_not_found' ? 'warning' : 'error';
  return banner(kind, (data && data.error) || 'Erreur inconnue');
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------
document.getElementById('nav').addEventListener('click', e => {
  if (e.target.tagName !== 'BUTTON') return;
  const panel = e.target.dataset.panel;
  if (!panel) return;

  document.querySelectorAll('nav button').forEach(b => b.classList.remove('active'));
  e.target.classList.add('active');

  document.querySelectorAll('.panel').forEach(p => p.classList.remove('active'));
  document.getElementById('panel-' + panel).classList.add('active');

  if (panel === 'client' && !clientsLoaded) loadClients();
});

// ---------------------------------------------------------------------------
// Prediction tab
// ---------------------------------------------------------------------------
async function loadForm() {
  const { ok, data } = await api('GET', '/api/form');
  if (!ok) {
    document.getElementById('predict-result').innerHTML = errorBanner(data);
    return;
  }
  formSchema = data;
  const cols = { 1: [], 2: [] };
  for (const f of data.fields) {
    cols[f.column].push(renderField(f, data.defaults[f.key]));
  }
  document.getElementById('form-col-1').innerHTML = cols[1].join('');
  document.getElementById('form-col-2').innerHTML = cols[2].join('');
}

function renderField(f, initial) {
  const id = 'f-' + f.key;
  let input;
  if (f.kind === 'select') {
    const opts = f.options.map(o =>
      `<option value="${o.code}"${o.code === initial ? ' selected' : ''}>${esc(o.label)}</option>`
    ).join('');
    input = `<select id="${id}" name="${f.key}">${opts}</select>`;
  } else {
    const step = f.integer ? '1' : 'any';
    const min = f.min !== undefined ? ` min="${f.min}"` : '';
    input = `<input type="number" id="${id}" name="${f.key}" value="${initial}" step="${step}"${min} required>`;
  }
  return `<div class="field"><label for="${id}">${esc(f.label)}</label>${input}</div>`;
}

document.getElementById('predict-form').addEventListener('submit', async e => {
  e.preventDefault();
  if (!formSchema) return;

  const body = {};
  for (const f of formSchema.fields) {
    body[f.key] = Number(document.getElementById('f-' + f.key).value);
  }

  const btn = document.getElementById('btn-predict');
  const out = document.getElementById('predict-result');
  btn.disabled = true;
  try {
    const { ok, data } = await api('POST', '/api/predict', body);
    out.innerHTML = ok ? renderResult(data, true) : errorBanner(data);
  } catch (err) {
    out.innerHTML = banner('error', err.message);
  } finally {
    btn.disabled = false;
  }
});

function renderResult(data, full) {
  const kind = data.assessment.decision === 'approved' ? 'success' : 'error';
  let html = banner(kind, data.message);
  const c = data.charts;
  if (full) {
    html += '<div class="charts">';
    html += `<div class="chart">${c.gauge}</div>`;
    if (c.pie) html += `<div class="chart">${c.pie}</div>`;
    if (c.histogram) html += `<div class="chart wide">${c.histogram}</div>`;
    html += '</div>';
  } else {
    html += `<div class="chart" style="max-width:420px">${c.gauge}</div>`;
  }
  return html;
}

// ---------------------------------------------------------------------------
// Client tab
// ---------------------------------------------------------------------------
async function loadClients() {
  const picker = document.getElementById('client-picker');
  const { ok, data } = await api('GET', '/api/clients');
  clientsLoaded = true;
  if (!ok) {
    picker.innerHTML = errorBanner(data);
    return;
  }
  const opts = data.ids.map(id => `<option value="${esc(id)}">${esc(id)}</option>`).join('');
  picker.innerHTML =
    `<label for="client-select">Sélectionnez un ID Client</label>` +
    `<select id="client-select"><option value="">—</option>${opts}</select>`;
  document.getElementById('client-select').addEventListener('change', e => showClient(e.target.value));
}

async function showClient(id) {
  const details = document.getElementById('client-details');
  document.getElementById('client-result').innerHTML = '';
  selectedClient = id || null;
  if (!id) {
    details.innerHTML = '';
    return;
  }
  const { ok, data } = await api('GET', '/api/clients/' + encodeURIComponent(id));
  if (!ok) {
    details.innerHTML = errorBanner(data);
    return;
  }
  const cards = data.cards.map(c =>
    `<div class="client-card"><div class="label">${esc(c.label)}</div><div class="value">${esc(c.value)}</div></div>`
  ).join('');
  details.innerHTML =
    `<div class="client-cards">${cards}</div>` +
    `<button class="btn" id="btn-client-predict">🔍 Prédire ce client</button>`;
  document.getElementById('btn-client-predict').addEventListener('click', predictClient);
}

async function predictClient() {
  if (!selectedClient) return;
  const btn = document.getElementById('btn-client-predict');
  const out = document.getElementById('client-result');
  btn.disabled = true;
  try {
    const { ok, data } = await api('POST', '/api/clients/' + encodeURIComponent(selectedClient) + '/predict');
    out.innerHTML = ok ? renderResult(data, false) : errorBanner(data);
  } catch (err) {
    out.innerHTML = banner('error', err.message);
  } finally {
    btn.disabled = false;
  }
}

// ---------------------------------------------------------------------------
// Health badges
// ---------------------------------------------------------------------------
async function loadHealth() {
  try {
    const { data: h } = await api('GET', '/api/health');
    document.getElementById('health-badges').innerHTML = [
      badge('train.csv', h.train_csv.exists ? 'ok' : 'warn'),
      badge('test.csv', h.test_csv.exists ? 'ok' : 'warn'),
      badge('Seuil ' + h.threshold_pct + '%', 'ok'),
    ].join('');
  } catch (e) {
    // Badges are informational only
  }
}

function badge(label, cls) {
  const dot = cls === 'ok' ? '●' : '○';
  return `<span class="badge ${cls}">${dot} ${esc(label)}</span>`;
}

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------
function esc(s) {
  if (s === undefined || s === null) return '';
  return String(s).replace(/&/g,'&amp;').replace(/</g,'&lt;').replace(/>/g,'&gt;').replace(/"/g,'&quot;');
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
loadHealth();
loadForm();
</script>
</body>
</html>"##;
