//! Static landing page served at `/`

pub const HOME_PAGE: &str = r#"<html>
  <head>
    <title>Direct API Server</title>
    <style>
      body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
      h1 { color: #333; }
      pre { background: #f4f4f4; padding: 10px; border-radius: 5px; }
      .endpoint { margin-bottom: 20px; }
    </style>
  </head>
  <body>
    <h1>Direct API Server</h1>
    <p>A session-scoped JSON-RPC tool server over plain HTTP request/response.</p>

    <div class="endpoint">
      <h2>Endpoints:</h2>
      <ul>
        <li><strong>POST /register</strong> - Register a new session</li>
        <li><strong>POST /api/message?sessionId=ID</strong> - Send a message</li>
        <li><strong>GET /status</strong> - Check server status</li>
        <li><strong>GET /health</strong> - Health check</li>
      </ul>
    </div>

    <div class="endpoint">
      <h2>Methods:</h2>
      <pre>initialize, listTools, callTool, ping</pre>
    </div>

    <div class="endpoint">
      <h2>Available Tools:</h2>
      <ul>
        <li><strong>fetchWebsite</strong> - Fetches content from a specified URL</li>
      </ul>
    </div>
  </body>
</html>
"#;
