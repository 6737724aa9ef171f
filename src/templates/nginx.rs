//! nginx site configuration served by the Docker image.

/// Generates the nginx `server` block for a single-page static site.
/// Static assets are cached for a year, HTML is never cached and unknown
/// paths fall back to `index.html`.
pub fn generate(compress: bool) -> String {
    let gzip = if compress {
        r#"
    gzip on;
    gzip_vary on;
    gzip_min_length 1024;
    gzip_types text/plain text/css text/xml text/javascript application/javascript application/xml+rss application/json model/gltf+json;
"#
    } else {
        ""
    };

    format!(
        r#"server {{
    listen 80;
    server_name localhost;
    root /usr/share/nginx/html;
    index index.html;
{gzip}
    location ~* \.(js|mjs|css|png|jpg|jpeg|gif|ico|svg|woff|woff2|ttf|eot|glb|gltf|bin|hdr)$ {{
        expires 1y;
        add_header Cache-Control "public, immutable";
        add_header Access-Control-Allow-Origin *;
    }}

    location ~* \.html$ {{
        expires -1;
        add_header Cache-Control "no-cache, no-store, must-revalidate";
    }}

    location / {{
        try_files $uri $uri/ /index.html;
        add_header Access-Control-Allow-Origin *;
        add_header Access-Control-Allow-Methods "GET, POST, OPTIONS";
        add_header Access-Control-Allow-Headers "DNT,User-Agent,X-Requested-With,If-Modified-Since,Cache-Control,Content-Type,Range";
    }}

    add_header X-Frame-Options "SAMEORIGIN" always;
    add_header X-Content-Type-Options "nosniff" always;
    add_header Referrer-Policy "no-referrer-when-downgrade" always;

    error_page 404 /index.html;
}}
"#,
        gzip = gzip
    )
}
