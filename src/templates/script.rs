//! Hand-off files for deploying the output without vizdeploy.

use crate::core::config::DeployConfig;

/// Shell script that rebuilds and restarts the container.
pub fn generate_deploy_script(config: &DeployConfig) -> String {
    format!(
        r#"#!/bin/sh
set -e

IMAGE="{image}"
CONTAINER="{container}"
PORT="{port}"

echo "Building image $IMAGE..."
docker build -t "$IMAGE:latest" .

echo "Replacing container $CONTAINER..."
docker stop "$CONTAINER" 2>/dev/null || true
docker rm "$CONTAINER" 2>/dev/null || true

docker run -d --name "$CONTAINER" --restart unless-stopped -p "$PORT:80" "$IMAGE:latest"

echo "Deployed: http://localhost:$PORT"
"#,
        image = config.docker_image(),
        container = config.docker_container(),
        port = config.docker_host_port()
    )
}

/// Deployment notes shipped next to the build output.
pub fn generate_readme(config: &DeployConfig) -> String {
    let port = config.docker_host_port();
    format!(
        r#"# {name} v{version} - deployment

This directory is a self-contained static site. Serve it from any static host.

## Docker

```sh
./deploy.sh
```

or with compose:

```sh
docker compose up -d --build
```

The site is then available at http://localhost:{port}.

## Vercel

```sh
npm i -g vercel
vercel --prod --yes
```

## Netlify

```sh
npm i -g netlify-cli
netlify deploy --prod --dir .
```

## GitHub Pages

Push the contents of this directory to the `{branch}` branch with a `.nojekyll`
file at the root, or run `vizdeploy deploy github-pages`.

## Any web server

Copy every file to the document root. Unknown paths should fall back to
`index.html`; see `nginx.conf` for a working example.
"#,
        name = config.project_name,
        version = config.version,
        port = port,
        branch = config.github_pages.branch
    )
}
