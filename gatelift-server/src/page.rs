//! Embedded dashboard page
//!
//! A single self-contained HTML page: file picker, optional overrides, and
//! result panels rendered from the analyze endpoint's JSON. No build step,
//! no external assets.

/// The dashboard, served at `/`
pub const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Gatelift</title>
<style>
  :root {
    --bg: #11151c; --panel: #1a2029; --border: #2b3442;
    --text: #dbe2ec; --muted: #8594a8;
    --good: #4cc38a; --bad: #e05260; --meh: #d8a23c; --accent: #5b9dd9;
  }
  * { box-sizing: border-box; }
  body {
    margin: 0; background: var(--bg); color: var(--text);
    font: 15px/1.5 -apple-system, "Segoe UI", Roboto, sans-serif;
  }
  main { max-width: 960px; margin: 0 auto; padding: 2rem 1rem 4rem; }
  h1 { font-size: 1.5rem; margin: 0 0 0.25rem; }
  .sub { color: var(--muted); margin: 0 0 1.5rem; }
  .panel {
    background: var(--panel); border: 1px solid var(--border);
    border-radius: 8px; padding: 1rem 1.25rem; margin-bottom: 1rem;
  }
  .panel h2 { font-size: 1rem; margin: 0 0 0.75rem; color: var(--muted);
    text-transform: uppercase; letter-spacing: 0.05em; }
  form { display: flex; flex-wrap: wrap; gap: 0.75rem; align-items: end; }
  label { display: flex; flex-direction: column; gap: 0.25rem;
    font-size: 0.8rem; color: var(--muted); }
  input {
    background: var(--bg); color: var(--text); border: 1px solid var(--border);
    border-radius: 5px; padding: 0.4rem 0.6rem; font-size: 0.9rem;
  }
  input[type=number] { width: 7.5rem; }
  button {
    background: var(--accent); color: #0b0e13; border: 0; border-radius: 5px;
    padding: 0.5rem 1.2rem; font-size: 0.9rem; font-weight: 600; cursor: pointer;
  }
  button:disabled { opacity: 0.5; cursor: wait; }
  table { width: 100%; border-collapse: collapse; }
  th, td { text-align: right; padding: 0.35rem 0.6rem; border-bottom: 1px solid var(--border); }
  th:first-child, td:first-child { text-align: left; }
  th { color: var(--muted); font-weight: 500; font-size: 0.8rem; }
  #verdict { font-size: 1.05rem; border-left: 4px solid var(--muted); }
  #verdict.test_wins { border-left-color: var(--good); }
  #verdict.control_wins { border-left-color: var(--bad); }
  #verdict.inconclusive { border-left-color: var(--meh); }
  #error { display: none; border-left: 4px solid var(--bad); color: var(--bad); }
  .charts { display: flex; flex-wrap: wrap; gap: 1rem; }
  .charts figure { flex: 1 1 20rem; margin: 0; }
  figcaption { color: var(--muted); font-size: 0.8rem; margin-top: 0.35rem; }
  canvas { width: 100%; height: 180px; background: var(--bg);
    border: 1px solid var(--border); border-radius: 5px; }
  .stat { color: var(--muted); font-size: 0.85rem; }
  #results { display: none; }
</style>
</head>
<body>
<main>
  <h1>Gatelift</h1>
  <p class="sub">Upload an A/B experiment log to compare retention and engagement between arms.</p>

  <section class="panel">
    <form id="form">
      <label>Experiment CSV
        <input type="file" name="file" accept=".csv,text/csv" required>
      </label>
      <label>Rounds cutoff
        <input type="number" name="cutoff" min="1" placeholder="3000">
      </label>
      <label>Bootstrap iterations
        <input type="number" name="iterations" min="1" placeholder="1000">
      </label>
      <label>Seed (optional)
        <input type="number" name="seed" min="0" placeholder="random">
      </label>
      <button type="submit" id="run">Analyze</button>
    </form>
  </section>

  <section class="panel" id="error"></section>

  <div id="results">
    <section class="panel" id="verdict"></section>

    <section class="panel">
      <h2>Groups</h2>
      <table>
        <thead><tr>
          <th>Arm</th><th>Players</th><th>1-day ret.</th><th>7-day ret.</th>
          <th>Mean rounds</th><th>Median rounds</th>
        </tr></thead>
        <tbody id="groups"></tbody>
      </table>
      <p class="stat" id="cleaning"></p>
    </section>

    <section class="panel">
      <h2>Retention (bootstrap)</h2>
      <table>
        <thead><tr>
          <th>Window</th><th>Control</th><th>Test</th><th>Diff</th>
          <th>CI</th><th>P(test better)</th>
        </tr></thead>
        <tbody id="retention"></tbody>
      </table>
      <div class="charts" id="charts"></div>
    </section>

    <section class="panel">
      <h2>Engagement (Mann-Whitney U)</h2>
      <p id="engagement"></p>
      <div class="charts">
        <figure>
          <canvas id="rounds-chart"></canvas>
          <figcaption>Game rounds per player by arm, log scale
            (control in grey, test in blue)</figcaption>
        </figure>
      </div>
    </section>
  </div>
</main>

<script>
const form = document.getElementById('form');
const runBtn = document.getElementById('run');
const errorBox = document.getElementById('error');
const results = document.getElementById('results');

const pct = x => (x * 100).toFixed(2) + '%';
const pp = x => (x >= 0 ? '+' : '') + (x * 100).toFixed(2) + 'pp';

form.addEventListener('submit', async (e) => {
  e.preventDefault();
  errorBox.style.display = 'none';
  results.style.display = 'none';
  runBtn.disabled = true;

  const data = new FormData();
  data.append('file', form.elements.file.files[0]);
  for (const name of ['cutoff', 'iterations', 'seed']) {
    if (form.elements[name].value) data.append(name, form.elements[name].value);
  }

  try {
    const resp = await fetch('/api/v1/analyze', { method: 'POST', body: data });
    const body = await resp.json();
    if (!resp.ok) {
      showError(body.error || { kind: 'upload', message: 'request failed' });
    } else {
      render(body);
    }
  } catch (err) {
    showError({ kind: 'upload', message: String(err) });
  } finally {
    runBtn.disabled = false;
  }
});

function showError(error) {
  const prefix = {
    data_format: 'Could not read that file',
    insufficient_data: 'Not enough data to analyze',
    upload: 'Upload failed',
  }[error.kind] || 'Error';
  errorBox.textContent = prefix + ': ' + error.message;
  errorBox.style.display = 'block';
}

function render(report) {
  const verdict = document.getElementById('verdict');
  verdict.className = 'panel ' + report.verdict.decision;
  verdict.textContent = report.verdict.summary;

  document.getElementById('groups').innerHTML = report.groups.map(g => `
    <tr><td>${g.group}</td><td>${g.count}</td>
    <td>${pct(g.retention_1_rate)}</td><td>${pct(g.retention_7_rate)}</td>
    <td>${g.mean_rounds.toFixed(1)}</td><td>${g.median_rounds.toFixed(1)}</td></tr>
  `).join('');

  const c = report.cleaning;
  document.getElementById('cleaning').textContent =
    `${c.rows_loaded} rows loaded, ${c.rows_removed} removed as outliers ` +
    `(rounds > ${c.rounds_cutoff}), ${c.rows_analyzed} analyzed.`;

  const windowName = w => w === 'day1' ? '1-day' : '7-day';
  document.getElementById('retention').innerHTML = report.retention.map(r => `
    <tr><td>${windowName(r.window)}</td>
    <td>${pct(r.control_rate)}</td><td>${pct(r.test_rate)}</td>
    <td>${pp(r.observed_diff)}</td>
    <td>[${pp(r.ci_lower)}, ${pp(r.ci_upper)}]</td>
    <td>${pct(r.probability_test_better)}</td></tr>
  `).join('');

  const charts = document.getElementById('charts');
  charts.innerHTML = '';
  for (const r of report.retention) {
    const fig = document.createElement('figure');
    const canvas = document.createElement('canvas');
    const caption = document.createElement('figcaption');
    caption.textContent = windowName(r.window) +
      ' retention: bootstrap distribution of (test - control)';
    fig.append(canvas, caption);
    charts.append(fig);
    drawHistogram(canvas, r.histogram);
  }

  const en = report.engagement;
  const style = getComputedStyle(document.documentElement);
  drawGroupHistograms(document.getElementById('rounds-chart'), [
    { hist: en.control_rounds_histogram, color: style.getPropertyValue('--muted') },
    { hist: en.test_rounds_histogram, color: style.getPropertyValue('--accent') },
  ]);
  document.getElementById('engagement').innerHTML =
    `U = ${en.u_statistic.toFixed(1)}, p = ${en.p_value.toPrecision(3)}, ` +
    `rank-biserial = ${en.rank_biserial.toFixed(3)}.<br>` +
    `<span class="stat">Median rounds: control ${en.control_median_rounds.toFixed(1)} ` +
    `vs test ${en.test_median_rounds.toFixed(1)}. ` +
    (en.is_significant
      ? 'Play behavior differs significantly between arms.'
      : 'No significant difference in play behavior.') + '</span>';

  results.style.display = 'block';
}

function drawHistogram(canvas, hist) {
  canvas.width = canvas.clientWidth * devicePixelRatio;
  canvas.height = canvas.clientHeight * devicePixelRatio;
  const ctx = canvas.getContext('2d');
  ctx.scale(devicePixelRatio, devicePixelRatio);

  const w = canvas.clientWidth, h = canvas.clientHeight, pad = 8;
  const bins = hist.bins;
  if (!bins.length) return;

  const maxCount = Math.max(...bins.map(b => b.count), 1);
  const lo = bins[0].lower, hi = bins[bins.length - 1].upper;
  const xOf = v => pad + (v - lo) / (hi - lo || 1) * (w - 2 * pad);

  const style = getComputedStyle(document.documentElement);
  ctx.fillStyle = style.getPropertyValue('--accent');
  for (const b of bins) {
    const x0 = xOf(b.lower), x1 = xOf(b.upper);
    const barH = b.count / maxCount * (h - 2 * pad);
    ctx.fillRect(x0, h - pad - barH, Math.max(x1 - x0 - 1, 1), barH);
  }

  // Zero line marks "no difference between arms".
  if (lo < 0 && hi > 0) {
    ctx.strokeStyle = style.getPropertyValue('--muted');
    ctx.setLineDash([3, 3]);
    ctx.beginPath();
    ctx.moveTo(xOf(0), pad);
    ctx.lineTo(xOf(0), h - pad);
    ctx.stroke();
  }
}

// Overlaid per-arm distributions. Each arm is normalized to its own total so
// the shapes are comparable despite different group sizes; bin edges are
// already in log10(rounds + 1) space.
function drawGroupHistograms(canvas, series) {
  canvas.width = canvas.clientWidth * devicePixelRatio;
  canvas.height = canvas.clientHeight * devicePixelRatio;
  const ctx = canvas.getContext('2d');
  ctx.scale(devicePixelRatio, devicePixelRatio);

  const w = canvas.clientWidth, h = canvas.clientHeight, pad = 8;
  series = series.filter(s => s.hist.bins.length);
  if (!series.length) return;

  const lo = Math.min(...series.map(s => s.hist.bins[0].lower));
  const hi = Math.max(...series.map(s => s.hist.bins[s.hist.bins.length - 1].upper));
  const xOf = v => pad + (v - lo) / (hi - lo || 1) * (w - 2 * pad);

  const density = (s, b) => b.count / (s.hist.total || 1);
  const maxDensity = Math.max(...series.flatMap(s => s.hist.bins.map(b => density(s, b))), 1e-9);

  ctx.globalAlpha = 0.55;
  for (const s of series) {
    ctx.fillStyle = s.color;
    for (const b of s.hist.bins) {
      const x0 = xOf(b.lower), x1 = xOf(b.upper);
      const barH = density(s, b) / maxDensity * (h - 2 * pad);
      ctx.fillRect(x0, h - pad - barH, Math.max(x1 - x0 - 1, 1), barH);
    }
  }
  ctx.globalAlpha = 1;
}
</script>
</body>
</html>
"#;
