/// In-browser IDE posting to `/graphql`. Assets load from cdnjs.
pub(crate) const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8" />
  <title>minigql</title>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/graphiql/0.10.2/graphiql.css" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/fetch/1.1.0/fetch.min.js"></script>
  <script src="https://cdnjs.cloudflare.com/ajax/libs/react/15.5.4/react.min.js"></script>
  <script src="https://cdnjs.cloudflare.com/ajax/libs/react/15.5.4/react-dom.min.js"></script>
  <script src="https://cdnjs.cloudflare.com/ajax/libs/graphiql/0.10.2/graphiql.js"></script>
</head>
<body style="width: 100%; height: 100%; margin: 0; overflow: hidden;">
  <div id="graphiql" style="height: 100vh;">Loading...</div>
  <script>
    function fetcher(params) {
      return fetch("/graphql", {
        method: "post",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify(params),
      }).then(function (response) {
        return response.json();
      });
    }
    ReactDOM.render(
      React.createElement(GraphiQL, { fetcher: fetcher }),
      document.getElementById("graphiql")
    );
  </script>
</body>
</html>
"#;
