//! OpenAPI document served at `/openapi.json`

use serde_json::{Value, json};

pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Roundtable API",
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": {
            "/api/chat": {
                "post": {
                    "summary": "Answer a message with the specialist panel",
                    "security": [{ "bearerAuth": [] }],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/ChatRequest" }
                            }
                        }
                    },
                    "responses": {
                        "200": response_ref("OK"),
                        "400": response_ref("Malformed or invalid request"),
                        "401": response_ref("Missing or wrong bearer token")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Liveness probe",
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": { "ok": { "type": "boolean" } }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "securitySchemes": {
                "bearerAuth": { "type": "http", "scheme": "bearer" }
            },
            "schemas": {
                "ChatRequest": {
                    "type": "object",
                    "required": ["source", "mode", "user", "message"],
                    "properties": {
                        "source": { "type": "string" },
                        "mode": { "type": "string", "enum": ["ask", "audit", "deep"] },
                        "user": {
                            "type": "object",
                            "required": ["id"],
                            "properties": {
                                "id": { "type": "string" },
                                "name": { "type": "string" }
                            }
                        },
                        "context": { "type": "string" },
                        "message": { "type": "string", "minLength": 1 },
                        "attachments": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "name": { "type": "string" },
                                    "type": { "type": "string" },
                                    "url": { "type": "string" }
                                }
                            }
                        }
                    }
                },
                "ChatResponse": {
                    "type": "object",
                    "required": ["reply"],
                    "properties": {
                        "reply": { "type": "string" },
                        "runId": { "type": "string" },
                        "meta": {
                            "type": "object",
                            "properties": {
                                "taskType": { "type": "string" },
                                "c_final": { "type": "number" },
                                "budget": {
                                    "type": "object",
                                    "properties": {
                                        "capUsd": { "type": "number" },
                                        "estimatedUsd": { "type": "number" },
                                        "modeCapExceeded": { "type": "boolean" }
                                    }
                                },
                                "usedAgents": { "type": "array", "items": { "type": "string" } },
                                "invalidation": {
                                    "type": "object",
                                    "properties": {
                                        "discarded": { "type": "array", "items": { "type": "string" } },
                                        "quarantined": { "type": "array", "items": { "type": "string" } },
                                        "valid": { "type": "array", "items": { "type": "string" } }
                                    }
                                }
                            }
                        },
                        "audit": { "type": "object" }
                    }
                }
            }
        }
    })
}

fn response_ref(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ChatResponse" }
            }
        }
    })
}
