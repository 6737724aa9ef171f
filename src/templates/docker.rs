//! Container packaging for the static site.

/// Dockerfile serving the build output with nginx.
pub fn generate_dockerfile() -> String {
    r#"FROM nginx:alpine

COPY . /usr/share/nginx/html/
COPY nginx.conf /etc/nginx/conf.d/default.conf

EXPOSE 80

CMD ["nginx", "-g", "daemon off;"]
"#
    .to_string()
}

/// Compose file running the image built from the output directory.
pub fn generate_compose(container_name: &str, host_port: u16) -> String {
    format!(
        r#"version: '3.8'

services:
  web:
    build: .
    container_name: {container_name}
    ports:
      - "{host_port}:80"
    restart: unless-stopped
    environment:
      - NGINX_HOST=localhost
      - NGINX_PORT=80
    volumes:
      - ./logs:/var/log/nginx
"#,
        container_name = container_name,
        host_port = host_port
    )
}

/// Keeps deployment helpers out of the image.
pub fn generate_dockerignore() -> String {
    r#"Dockerfile
.dockerignore
docker-compose.yml
deploy.sh
README_DEPLOY.md
logs/
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dockerfile_copies_nginx_config() {
        let dockerfile = generate_dockerfile();
        assert!(dockerfile.starts_with("FROM nginx:alpine"));
        assert!(dockerfile.contains("COPY nginx.conf /etc/nginx/conf.d/default.conf"));
        assert!(dockerfile.contains("EXPOSE 80"));
    }

    #[test]
    fn test_compose_maps_host_port() {
        let compose = generate_compose("plant-viz", 8080);
        assert!(compose.contains("container_name: plant-viz"));
        assert!(compose.contains("\"8080:80\""));
        assert!(compose.contains("restart: unless-stopped"));
    }
}
