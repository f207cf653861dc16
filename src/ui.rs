pub fn render_index(date: &str) -> String {
    INDEX_HTML.replace("{{DATE}}", date)
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="ko">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>안전관리 대시보드</title>
  <style>
    :root {
      --bg: #f5f6f8;
      --ink: #1f2937;
      --muted: #6b7280;
      --accent: #e31e24;
      --line: #e5e7eb;
      --card: #ffffff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      display: flex;
      background: var(--bg);
      color: var(--ink);
      font-family: "Pretendard", "Apple SD Gothic Neo", "Malgun Gothic", sans-serif;
    }

    aside {
      width: 220px;
      flex-shrink: 0;
      background: var(--card);
      border-right: 1px solid var(--line);
      padding: 20px 12px;
    }

    aside h1 {
      font-size: 1.15rem;
      margin: 0 8px 20px;
      color: var(--accent);
    }

    aside button {
      display: block;
      width: 100%;
      text-align: left;
      border: none;
      background: transparent;
      padding: 11px 14px;
      margin-bottom: 4px;
      border-radius: 10px;
      font-size: 0.95rem;
      font-weight: 600;
      color: var(--muted);
      cursor: pointer;
    }

    aside button.active {
      background: #fef2f2;
      color: var(--accent);
    }

    main {
      flex: 1;
      min-width: 0;
      padding: 20px 28px 40px;
    }

    header.topbar {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      margin-bottom: 18px;
    }

    .topbar h2 {
      margin: 0;
      font-size: 1.25rem;
    }

    .topbar .account {
      font-size: 0.85rem;
      color: var(--muted);
    }

    .controls {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      gap: 10px;
      margin-bottom: 18px;
    }

    select,
    input[type="date"] {
      border: 1px solid var(--line);
      border-radius: 8px;
      padding: 8px 10px;
      font-size: 0.9rem;
      background: var(--card);
    }

    .tabs {
      display: flex;
      gap: 4px;
      background: #e9ebef;
      padding: 4px;
      border-radius: 999px;
    }

    .tabs button {
      border: none;
      background: transparent;
      border-radius: 999px;
      padding: 6px 14px;
      font-size: 0.85rem;
      font-weight: 600;
      color: var(--muted);
      cursor: pointer;
    }

    .tabs button.active {
      background: var(--card);
      color: var(--ink);
      box-shadow: 0 2px 6px rgba(31, 41, 55, 0.12);
    }

    .range-label {
      font-size: 0.85rem;
      color: var(--muted);
    }

    .kpis {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 12px;
      margin-bottom: 18px;
    }

    .kpi {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 14px 16px;
    }

    .kpi .label {
      font-size: 0.78rem;
      color: var(--muted);
    }

    .kpi .value {
      font-size: 1.45rem;
      font-weight: 700;
      margin-top: 4px;
    }

    .kpi .hint {
      cursor: help;
      color: var(--muted);
      font-size: 0.75rem;
      margin-left: 4px;
    }

    .panel {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 16px;
      overflow-x: auto;
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.88rem;
    }

    th,
    td {
      text-align: right;
      padding: 9px 10px;
      border-bottom: 1px solid var(--line);
      white-space: nowrap;
    }

    th:first-child,
    td:first-child {
      text-align: left;
    }

    th {
      color: var(--muted);
      font-weight: 600;
      font-size: 0.8rem;
    }

    tr.site-row td:first-child {
      font-weight: 700;
      cursor: pointer;
    }

    tr.partner-row td:first-child {
      padding-left: 26px;
      font-weight: 600;
      cursor: pointer;
    }

    tr.doctype-row td:first-child {
      padding-left: 46px;
      color: var(--muted);
    }

    .status {
      padding: 36px 16px;
      text-align: center;
      color: var(--muted);
      font-size: 0.92rem;
    }

    .status.error {
      color: var(--accent);
    }

    .status button {
      margin-top: 10px;
      border: 1px solid var(--line);
      background: var(--card);
      border-radius: 8px;
      padding: 7px 16px;
      cursor: pointer;
    }
  </style>
</head>
<body>
  <aside>
    <h1>현장통 안전관리</h1>
    <button data-menu="dashboard" class="active">출퇴근 현황</button>
    <button data-menu="risk">위험성평가 현황</button>
    <button data-menu="tbm">TBM 활동 현황</button>
  </aside>

  <main>
    <header class="topbar">
      <h2 id="page-title">출퇴근 현황</h2>
      <span class="account">홍길동 관리자</span>
    </header>

    <div class="controls">
      <select id="site-select">
        <option value="">전체 현장</option>
      </select>
      <div class="tabs" id="period-tabs">
        <button data-period="DAILY" class="active">일간</button>
        <button data-period="WEEKLY">주간</button>
        <button data-period="MONTHLY">월간</button>
      </div>
      <input type="date" id="date-input" value="{{DATE}}" />
      <span class="range-label" id="range-label"></span>
    </div>

    <section class="kpis" id="kpis"></section>
    <section class="panel" id="content"></section>
  </main>

  <script>
    const menuTitles = {
      dashboard: '출퇴근 현황',
      risk: '위험성평가 현황',
      tbm: 'TBM 활동 현황'
    };

    const state = {
      menu: 'dashboard',
      period: 'DAILY',
      date: document.getElementById('date-input').value,
      siteId: null
    };

    // Generation token per load; a stale response must never overwrite a
    // fresher one.
    let generation = 0;
    // Suppresses the history push for the synthetic selection performed by
    // the popstate handler.
    let navigatingBack = false;

    const siteSelect = document.getElementById('site-select');
    const kpisEl = document.getElementById('kpis');
    const contentEl = document.getElementById('content');
    const rangeLabel = document.getElementById('range-label');

    // Expansion state, rebuilt fully expanded on every data load.
    let expandedSites = new Set();
    let expandedPartners = new Set();
    const partnerKey = (siteId, partnerId) => siteId + ':' + partnerId;

    const query = (params) => {
      const search = new URLSearchParams();
      Object.entries(params).forEach(([key, value]) => {
        if (value !== null && value !== undefined && value !== '') {
          search.append(key, value);
        }
      });
      const text = search.toString();
      return text ? '?' + text : '';
    };

    const fetchJson = async (path, params) => {
      const res = await fetch(path + query(params || {}));
      if (!res.ok) {
        const body = await res.text();
        throw new Error('API ' + res.status + ': ' + body);
      }
      return res.json();
    };

    const showStatus = (message, kind, retry) => {
      kpisEl.innerHTML = '';
      contentEl.innerHTML = '<div class="status ' + (kind || '') + '">' + message +
        (retry ? '<br /><button id="retry-btn">다시 시도</button>' : '') + '</div>';
      if (retry) {
        document.getElementById('retry-btn').addEventListener('click', load);
      }
    };

    const kpi = (label, value, hint) => (
      '<div class="kpi"><span class="label">' + label +
      (hint ? '<span class="hint" title="' + hint + '">ⓘ</span>' : '') +
      '</span><div class="value">' + value + '</div></div>'
    );

    const renderDashboard = (data) => {
      const s = data.summary;
      kpisEl.innerHTML =
        kpi('총 출근 인원', s.total_workers) +
        kpi('관리자 / 근로자', s.manager_count + ' / ' + s.field_worker_count) +
        kpi('고령 근로자(65세 이상)', s.senior_total) +
        kpi('퇴근율', s.checkout_rate + '%') +
        kpi('사고 건수', s.accident_count);

      const head = state.siteId === null ? '현장' : '협력사';
      let html = '<table><thead><tr><th>' + head +
        '</th><th>관리자</th><th>근로자</th><th>합계</th><th>고령자</th><th>퇴근</th><th>퇴근율</th><th>사고</th></tr></thead><tbody>';
      data.rows.forEach((row) => {
        html += '<tr><td>' + row.label + '</td><td>' + row.manager_count +
          '</td><td>' + row.worker_count + '</td><td>' + row.total_count +
          '</td><td>' + row.total_senior_count + '</td><td>' + row.checkout_count +
          '</td><td>' + row.checkout_rate + '%</td><td>' + row.accident_count + '</td></tr>';
      });
      contentEl.innerHTML = html + '</tbody></table>';
    };

    const CONFIRM_HINT =
      '확인 근로자 수는 관리기간이 끝난 문서만 집계합니다. 진행 중인 문서의 확인은 제외되므로 일일 출근 인원과 직접 비교할 수 없습니다.';

    const doctypeRows = (siteKey, row) => {
      let html = '';
      row.doc_types.forEach((t) => {
        html += '<tr class="doctype-row" data-parent="' + partnerKey(siteKey, row.id) + '"><td>' +
          t.doc_type + '</td><td>' + t.doc_count + '</td><td>' + t.risk_count +
          '</td><td>' + t.measure_count + '</td><td>' + t.action_count +
          '</td><td>' + t.confirm_count + '</td></tr>';
      });
      return html;
    };

    const renderRisk = (data) => {
      const s = data.summary;
      kpisEl.innerHTML =
        kpi('참여 협력사', s.participating_companies) +
        kpi('운영 중 문서', s.active_documents) +
        kpi('발굴 위험요인', s.risk_factors) +
        kpi('조치이행 결과', s.action_results, CONFIRM_HINT);

      const header = '<th>문서</th><th>위험요인</th><th>개선대책</th><th>조치이행</th><th>확인 근로자</th>';
      let html;
      if (state.siteId === null) {
        html = '<table><thead><tr><th>현장 / 협력사</th>' + header + '</tr></thead><tbody>';
        data.rows.forEach((site) => {
          html += '<tr class="site-row" data-site="' + site.id + '"><td>▾ ' + site.label +
            '</td><td>' + site.total_doc_count + '</td><td>' + site.total_risk_count +
            '</td><td>' + site.total_measure_count + '</td><td>' + site.total_action_count +
            '</td><td>' + site.total_confirm_count + '</td></tr>';
          site.companies.forEach((company) => {
            html += '<tr class="partner-row" data-site="' + site.id + '" data-partner="' + company.id +
              '"><td>▾ ' + company.label + '</td><td>' + company.total_doc_count +
              '</td><td>' + company.total_risk_count + '</td><td>' + company.total_measure_count +
              '</td><td>' + company.total_action_count + '</td><td>' + company.total_confirm_count +
              '</td></tr>';
            html += doctypeRows(site.id, company);
          });
        });
      } else {
        html = '<table><thead><tr><th>협력사</th>' + header + '</tr></thead><tbody>';
        data.rows.forEach((company) => {
          html += '<tr class="partner-row" data-site="' + state.siteId + '" data-partner="' + company.id +
            '"><td>▾ ' + company.label + '</td><td>' + company.total_doc_count +
            '</td><td>' + company.total_risk_count + '</td><td>' + company.total_measure_count +
            '</td><td>' + company.total_action_count + '</td><td>' + company.total_confirm_count +
            '</td></tr>';
          html += doctypeRows(state.siteId, company);
        });
      }
      contentEl.innerHTML = html + '</tbody></table>';
      applyExpansion();
      bindExpansion();
    };

    const renderTbm = (data) => {
      const s = data.summary;
      kpisEl.innerHTML =
        kpi('참여 협력사', s.participating_companies) +
        kpi('작성 TBM 문서', s.written_tbm_docs) +
        kpi('총 참석 인원', s.total_tbm_attendees) +
        kpi('참여율', s.participation_rate + '%');

      const head = state.siteId === null ? '현장' : '협력사';
      let html = '<table><thead><tr><th>' + head +
        '</th><th>TBM 건수</th><th>출근 인원</th><th>참석 인원</th><th>참여율</th></tr></thead><tbody>';
      data.rows.forEach((row) => {
        html += '<tr><td>' + row.label + '</td><td>' + row.tbm_count +
          '</td><td>' + row.total_attendance + '</td><td>' + row.attendees +
          '</td><td>' + row.rate + '%</td></tr>';
      });
      contentEl.innerHTML = html + '</tbody></table>';
    };

    const applyExpansion = () => {
      contentEl.querySelectorAll('tr.partner-row').forEach((row) => {
        const visible = expandedSites.has(row.dataset.site) || state.siteId !== null;
        row.style.display = visible ? '' : 'none';
      });
      contentEl.querySelectorAll('tr.doctype-row').forEach((row) => {
        const siteId = row.dataset.parent.split(':')[0];
        const parentVisible = state.siteId !== null || expandedSites.has(siteId);
        const visible = parentVisible && expandedPartners.has(row.dataset.parent);
        row.style.display = visible ? '' : 'none';
      });
    };

    const bindExpansion = () => {
      contentEl.querySelectorAll('tr.site-row').forEach((row) => {
        row.addEventListener('click', () => {
          const id = row.dataset.site;
          if (expandedSites.has(id)) expandedSites.delete(id); else expandedSites.add(id);
          applyExpansion();
        });
      });
      contentEl.querySelectorAll('tr.partner-row').forEach((row) => {
        row.addEventListener('click', () => {
          const key = partnerKey(row.dataset.site, row.dataset.partner);
          if (expandedPartners.has(key)) expandedPartners.delete(key); else expandedPartners.add(key);
          applyExpansion();
        });
      });
    };

    const resetExpansion = (data) => {
      expandedSites = new Set();
      expandedPartners = new Set();
      if (state.siteId === null) {
        data.rows.forEach((site) => {
          expandedSites.add(String(site.id));
          site.companies.forEach((company) => {
            expandedPartners.add(partnerKey(site.id, company.id));
          });
        });
      } else {
        data.rows.forEach((company) => {
          expandedPartners.add(partnerKey(state.siteId, company.id));
        });
      }
    };

    const emptyMessages = {
      dashboard: '해당 기간의 출근 데이터가 없습니다. 다른 날짜를 선택해 주세요.',
      risk: '해당 기간에 운영 중인 위험성평가 문서가 없습니다. 다른 날짜를 선택해 주세요.',
      tbm: '해당 기간의 TBM 기록이 없습니다. 다른 날짜를 선택해 주세요.'
    };

    const load = async () => {
      const token = ++generation;
      showStatus('데이터를 불러오는 중...');

      try {
        let data;
        if (state.menu === 'dashboard') {
          data = await fetchJson('/dashboard/summary', {
            site_id: state.siteId, date: state.date, period: state.period
          });
          if (token !== generation) return;
          if (data.summary.total_workers === 0) return showStatus(emptyMessages.dashboard);
          renderDashboard(data);
        } else if (state.menu === 'risk') {
          if (state.siteId === null) {
            data = await fetchJson('/risk/all-sites', { date: state.date, period: state.period });
          } else {
            data = await fetchJson('/risk/daily', {
              site_id: state.siteId, date: state.date, period: state.period
            });
          }
          if (token !== generation) return;
          if (data.rows.length === 0) return showStatus(emptyMessages.risk);
          resetExpansion(data);
          renderRisk(data);
        } else {
          data = await fetchJson('/dashboard/tbm', {
            site_id: state.siteId, date: state.date, period: state.period
          });
          if (token !== generation) return;
          if (data.rows.length === 0) return showStatus(emptyMessages.tbm);
          renderTbm(data);
        }
      } catch (err) {
        if (token !== generation) return;
        showStatus(err.message, 'error', true);
      }
    };

    // ---- history synchronization ----

    const selectSite = (siteId) => {
      if (navigatingBack) {
        navigatingBack = false;
        state.siteId = siteId;
        siteSelect.value = siteId === null ? '' : String(siteId);
        load();
        return;
      }
      state.siteId = siteId;
      if (siteId !== null) {
        history.pushState({ menu: state.menu, siteId, isAllSites: false }, '');
      }
      load();
    };

    window.addEventListener('popstate', () => {
      if (state.siteId !== null) {
        navigatingBack = true;
        selectSite(null);
        history.replaceState({ menu: state.menu, siteId: null, isAllSites: true }, '');
      }
      // Already all-sites: let the browser leave the page.
    });

    // ---- controls ----

    document.querySelectorAll('aside button').forEach((button) => {
      button.addEventListener('click', () => {
        state.menu = button.dataset.menu;
        document.querySelectorAll('aside button').forEach((b) =>
          b.classList.toggle('active', b === button));
        document.getElementById('page-title').textContent = menuTitles[state.menu];
        load();
      });
    });

    document.querySelectorAll('#period-tabs button').forEach((button) => {
      button.addEventListener('click', () => {
        state.period = button.dataset.period;
        document.querySelectorAll('#period-tabs button').forEach((b) =>
          b.classList.toggle('active', b === button));
        load();
      });
    });

    document.getElementById('date-input').addEventListener('change', (event) => {
      state.date = event.target.value;
      load();
    });

    siteSelect.addEventListener('change', () => {
      selectSite(siteSelect.value === '' ? null : Number(siteSelect.value));
    });

    const loadSites = async () => {
      try {
        const sites = await fetchJson('/sites');
        sites.forEach((site) => {
          const option = document.createElement('option');
          option.value = String(site.id);
          option.textContent = site.name;
          siteSelect.appendChild(option);
        });
      } catch (err) {
        console.error('현장 목록 조회 실패:', err);
      }
    };

    history.replaceState({ menu: state.menu, siteId: null, isAllSites: true }, '');
    loadSites();
    load();
  </script>
</body>
</html>
"##;
